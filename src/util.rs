pub trait StrExt: AsRef<str> {
    fn nonblank_to_some(&self) -> Option<String> {
        Some(self.as_ref().trim())
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
    }
}

impl<T: AsRef<str>> StrExt for T {}

#[macro_export]
macro_rules! error_exit {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
        ::std::process::exit(1)
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nonblank_passes_text_through() {
        assert_eq!("work notes".nonblank_to_some().as_deref(), Some("work notes"));
    }

    #[test]
    fn nonblank_trims() {
        assert_eq!("  todo \n".nonblank_to_some().as_deref(), Some("todo"));
    }

    #[test]
    fn blank_is_none() {
        assert_eq!("".nonblank_to_some(), None);
        assert_eq!(" \t\n".nonblank_to_some(), None);
    }
}
