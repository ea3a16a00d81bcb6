// src/macros.rs

/// Owned `String` from anything displayable; `s!()` is the empty string.
#[macro_export]
macro_rules! s {
    () => {
        ::std::string::String::new()
    };
    ($expr:expr) => {
        ::std::string::ToString::to_string(&$expr)
    };
}

/// Concatenate string-ish pieces into a fresh `String` (URL joins, labels).
#[macro_export]
macro_rules! join {
    ($first:expr $(, $rest:expr)+ $(,)?) => {{
        let mut out = $crate::s!($first);
        $(
            out.push_str(::std::convert::AsRef::<str>::as_ref(&$rest));
        )+
        out
    }};
}
