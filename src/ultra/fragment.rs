//! URL fragments that C43 compaction encodes as a single value.

/// Fragment dictionary, in table order.
pub const FRAGMENTS: [&[u8]; 27] = [
    b"http://", b"https://", b"http://www.", b"https://www.", b"ftp://", b"www.",
    b".com", b".edu", b".gov", b".int", b".mil", b".net", b".org", b".mobi", b".coop",
    b".biz", b".info", b"mailto:", b"tel:", b".cgi", b".asp", b".aspx", b".php",
    b".htm", b".html", b".shtml", b"file:",
];

pub const HTTP: usize = 0;
pub const HTTPS: usize = 1;
pub const HTTP_WWW: usize = 2;
pub const HTTPS_WWW: usize = 3;
pub const FTP: usize = 4;
pub const MAILTO: usize = 17;
pub const TEL: usize = 18;
/// Only reachable through its latch macro, never shifted.
pub const FILE: usize = 26;

/// Index of the fragment found at `position` in `source`.
///
/// Every entry is tried and the last match in table order is kept. This is
/// not a longest match: it only looks like one because longer entries
/// (`http://www.`, `.html`) follow their prefixes in the table.
pub fn find_fragment(source: &[u8], position: usize) -> Option<usize> {
    let rest = source.get(position..)?;
    FRAGMENTS.iter()
        .enumerate()
        .filter(|(_, fragment)| rest.starts_with(fragment))
        .map(|(index, _)| index)
        .last()
}

/// Length in bytes of fragment `index`.
#[inline]
pub fn fragment_len(index: usize) -> usize {
    FRAGMENTS[index].len()
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::{find_fragment, FRAGMENTS, FILE, HTTPS_WWW, HTTP_WWW};

    #[test_case(b"http://www.example.com", 0, Some(HTTP_WWW); "http www")]
    #[test_case(b"https://www.example.com", 0, Some(HTTPS_WWW); "https www")]
    #[test_case(b"http://example.com", 0, Some(0); "http")]
    #[test_case(b"example.com", 7, Some(6); "dot com")]
    #[test_case(b".html", 0, Some(24); "html over htm")]
    #[test_case(b".shtml", 0, Some(25); "shtml")]
    #[test_case(b".aspx", 0, Some(21); "aspx over asp")]
    #[test_case(b"file:///tmp", 0, Some(FILE); "file")]
    #[test_case(b"http:/", 0, None; "truncated")]
    #[test_case(b"abc", 5, None; "past the end")]
    fn test_find_fragment(source: &[u8], position: usize, expected: Option<usize>) {
        assert_eq!(find_fragment(source, position), expected);
    }

    #[test]
    fn test_every_fragment_finds_itself() {
        for (index, fragment) in FRAGMENTS.iter().enumerate() {
            assert_eq!(find_fragment(fragment, 0), Some(index));
        }
    }
}
