/// Print a startup line, tagged with the calling crate's name, before the
/// tracing subscriber exists.
#[macro_export]
macro_rules! bootstrap {
    ($x:expr $( , $xs:expr )* $(,)?) => {
        eprintln!(concat!("[", env!("CARGO_PKG_NAME"), " bootstrap] ", $x) $( , $xs )*)
    };
}

/// Warn about the error of a `Result` and keep going. Evaluates to the success
/// value, if any.
#[macro_export]
macro_rules! trace_catch {
    ($val:expr, $($rest:tt)*) => {
        match $val {
            Ok(v) => Some(v),
            Err(e) => {
                ::tracing::warn!(error = %e, $($rest)*);
                None
            },
        }
    };
}
