//! Source of lines for `inputi` and `inputs`.
//!
//! Mirrors the print handler: stdin for programs, a scripted queue of
//! lines for tests and embedders.

use std::collections::VecDeque;
use std::io::BufRead;
use std::sync::Arc;

use parking_lot::Mutex;

pub enum InputHandlerImpl {
    /// Reads the process's stdin.
    Stdin,
    /// Hands out pre-supplied lines in order.
    Scripted(Mutex<VecDeque<String>>),
}

impl InputHandlerImpl {
    /// Next line without its terminator, or `None` once input is exhausted.
    pub fn read_line(&self) -> Option<String> {
        match self {
            Self::Stdin => {
                let mut line = String::new();
                match std::io::stdin().lock().read_line(&mut line) {
                    Ok(0) | Err(_) => None,
                    Ok(_) => {
                        let trimmed = line.trim_end_matches(['\n', '\r']).len();
                        line.truncate(trimmed);
                        Some(line)
                    }
                }
            }
            Self::Scripted(lines) => lines.lock().pop_front(),
        }
    }

    /// Lines not yet consumed; always zero for stdin.
    pub fn remaining(&self) -> usize {
        match self {
            Self::Stdin => 0,
            Self::Scripted(lines) => lines.lock().len(),
        }
    }
}

pub type SharedInputHandler = Arc<InputHandlerImpl>;

pub fn stdin_handler() -> SharedInputHandler {
    Arc::new(InputHandlerImpl::Stdin)
}

pub fn scripted_handler<I, S>(lines: I) -> SharedInputHandler
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let queue = lines.into_iter().map(Into::into).collect();
    Arc::new(InputHandlerImpl::Scripted(Mutex::new(queue)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_lines_in_order() {
        let handler = scripted_handler(["12", "abc"]);
        assert_eq!(handler.remaining(), 2);
        assert_eq!(handler.read_line().as_deref(), Some("12"));
        assert_eq!(handler.read_line().as_deref(), Some("abc"));
        assert_eq!(handler.read_line(), None);
    }

    #[test]
    fn empty_script_is_exhausted() {
        let handler = scripted_handler(Vec::<String>::new());
        assert_eq!(handler.read_line(), None);
        assert_eq!(handler.remaining(), 0);
    }
}
