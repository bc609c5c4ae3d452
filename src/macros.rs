macro_rules! format_error {
    ($e:expr) => {
        return Err($crate::error::Error::Format(::std::string::String::from($e)))
    };
    ($fmt:expr, $($arg:tt)+) => {
        return Err($crate::error::Error::Format(format!($fmt, $($arg)+)))
    };
}
