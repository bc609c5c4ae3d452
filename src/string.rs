use crate::error::Result;

/// Searches the first `window_size` bytes of `data` starting at `start` for
/// a NUL byte, returning its position relative to `start`.
///
/// A NUL found at relative position zero is reported as `None`, the same as
/// no NUL at all, so a string that is empty at `start` never matches.
pub fn find_terminator(
    data: &[u8],
    start: usize,
    window_size: usize,
) -> Option<usize> {
    let window = data.get(start..)?;
    let window = &window[..window.len().min(window_size)];
    match window.iter().position(|&byte| byte == 0) {
        Some(0) | None => None,
        Some(index) => Some(index),
    }
}

/// Decodes a name whose bytes do not include the NUL terminator.
pub(crate) fn decode_name(bytes: &[u8]) -> Result<String> {
    match String::from_utf8(bytes.to_vec()) {
        Ok(name) => Ok(name),
        Err(error) => format_error!(
            "File name is not valid UTF-8 ({})",
            error.utf8_error()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::{decode_name, find_terminator};
    use crate::error::Error;

    #[test]
    fn terminator_relative_to_start() {
        let data = b"xxtest.txt\0rest";
        assert_eq!(find_terminator(data, 2, 128), Some(8));
        assert_eq!(find_terminator(data, 3, 128), Some(7));
    }

    #[test]
    fn terminator_at_start_of_window_is_not_found() {
        let data = b"ab\0cd\0";
        assert_eq!(find_terminator(data, 2, 128), None);
        assert_eq!(find_terminator(data, 1, 128), Some(1));
    }

    #[test]
    fn terminator_outside_window() {
        let data = b"abcdef\0";
        assert_eq!(find_terminator(data, 0, 6), None);
        assert_eq!(find_terminator(data, 0, 7), Some(6));
    }

    #[test]
    fn window_clamped_to_end_of_data() {
        assert_eq!(find_terminator(b"abc", 0, 128), None);
        assert_eq!(find_terminator(b"abc", 3, 128), None);
        assert_eq!(find_terminator(b"abc", 10, 128), None);
    }

    #[test]
    fn decode_utf8_names() {
        assert_eq!(decode_name(b"hi.txt").unwrap(), "hi.txt");
        assert_eq!(decode_name(b"\xe2\x98\x83.txt").unwrap(), "\u{2603}.txt");
        match decode_name(b"\xff.txt") {
            Err(Error::Format(_)) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
