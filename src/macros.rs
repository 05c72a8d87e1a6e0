// A simple macro for defining bitfield accessors/mutators.
macro_rules! define_bool {
    ($bit:expr, $vis:vis $is_fn_name:ident, $set_fn_name:ident) => {
        $vis fn $is_fn_name(&self) -> bool {
            self.bools & (0b1 << $bit) > 0
        }

        $vis fn $set_fn_name(&mut self, yes: bool) {
            if yes {
                self.bools |= 1 << $bit;
            } else {
                self.bools &= !(1 << $bit);
            }
        }
    };
}

// Logging macros. When the 'logging' feature is disabled, these expand to
// nothing and their arguments are never evaluated.
macro_rules! log {
    ($($tt:tt)*) => {
        #[cfg(feature = "logging")]
        {
            $($tt)*
        }
    }
}

macro_rules! debug {
    ($($tt:tt)*) => { log!(log::debug!($($tt)*)) }
}

macro_rules! trace {
    ($($tt:tt)*) => { log!(log::trace!($($tt)*)) }
}
