/// Numeric status code type. The integer value is the compatibility surface
/// shared with callers that only branch on zero/non-zero.
#[allow(non_camel_case_types)]
pub type status_code_t = u16;

/// Common status codes (0-999).
pub mod StatusCode {
    use super::status_code_t;

    pub const OK: status_code_t = 0;
    pub const INVALID_ARG: status_code_t = 1;
    pub const INVALID_CONFIG: status_code_t = 2;
    pub const CONFIG_PARSE_ERROR: status_code_t = 3;
    pub const IO_ERROR: status_code_t = 4;
    pub const UNKNOWN: status_code_t = 999;
}

/// Filesystem gateway status codes (1xxx).
pub mod FsCode {
    use super::status_code_t;

    pub const NOT_FOUND: status_code_t = 1000;
    pub const EXISTS: status_code_t = 1001;
    pub const NOT_EMPTY: status_code_t = 1002;
    pub const NOT_DIRECTORY: status_code_t = 1003;
    pub const IS_DIRECTORY: status_code_t = 1004;
    pub const NO_PERMISSION: status_code_t = 1005;
}

/// Change-manager and clearer status codes (2xxx).
pub mod CmCode {
    use super::status_code_t;

    pub const READ_ERROR: status_code_t = 2000;
    pub const MOVE_ERROR: status_code_t = 2001;
    pub const SWEEP_WALK_ERROR: status_code_t = 2002;
}

/// Classification of status code ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i8)]
pub enum StatusCodeType {
    Invalid = -1,
    Common = 0,
    Fs = 1,
    Cm = 2,
}

/// Determine the type/category of a status code.
pub fn type_of(code: status_code_t) -> StatusCodeType {
    match code {
        0..=999 => StatusCodeType::Common,
        1000..=1999 => StatusCodeType::Fs,
        2000..=2999 => StatusCodeType::Cm,
        _ => StatusCodeType::Invalid,
    }
}

/// Convert a status code to its human-readable name.
pub fn to_string(code: status_code_t) -> &'static str {
    match code {
        // Common
        StatusCode::OK => "OK",
        StatusCode::INVALID_ARG => "InvalidArg",
        StatusCode::INVALID_CONFIG => "InvalidConfig",
        StatusCode::CONFIG_PARSE_ERROR => "ConfigParseError",
        StatusCode::IO_ERROR => "IOError",
        StatusCode::UNKNOWN => "Unknown",

        // Fs
        FsCode::NOT_FOUND => "Fs::NotFound",
        FsCode::EXISTS => "Fs::Exists",
        FsCode::NOT_EMPTY => "Fs::NotEmpty",
        FsCode::NOT_DIRECTORY => "Fs::NotDirectory",
        FsCode::IS_DIRECTORY => "Fs::IsDirectory",
        FsCode::NO_PERMISSION => "Fs::NoPermission",

        // Cm
        CmCode::READ_ERROR => "Cm::ReadError",
        CmCode::MOVE_ERROR => "Cm::MoveError",
        CmCode::SWEEP_WALK_ERROR => "Cm::SweepWalkError",

        _ => "UnknownStatusCode",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_values() {
        assert_eq!(StatusCode::OK, 0);
        assert_eq!(StatusCode::UNKNOWN, 999);
        assert_eq!(FsCode::NOT_FOUND, 1000);
        assert_eq!(CmCode::READ_ERROR, 2000);
    }

    #[test]
    fn test_type_of() {
        assert_eq!(type_of(StatusCode::OK), StatusCodeType::Common);
        assert_eq!(type_of(StatusCode::UNKNOWN), StatusCodeType::Common);
        assert_eq!(type_of(FsCode::EXISTS), StatusCodeType::Fs);
        assert_eq!(type_of(CmCode::SWEEP_WALK_ERROR), StatusCodeType::Cm);
        assert_eq!(type_of(3000), StatusCodeType::Invalid);
        assert_eq!(type_of(65535), StatusCodeType::Invalid);
    }

    #[test]
    fn test_to_string() {
        assert_eq!(to_string(StatusCode::OK), "OK");
        assert_eq!(to_string(StatusCode::INVALID_ARG), "InvalidArg");
        assert_eq!(to_string(FsCode::NOT_FOUND), "Fs::NotFound");
        assert_eq!(to_string(CmCode::MOVE_ERROR), "Cm::MoveError");
        assert_eq!(to_string(12345), "UnknownStatusCode");
    }
}
