use std::borrow::Cow;

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8, WINDOWS_1252};
use log::{debug, warn};

/// Bytes inspected when looking for a BOM-less UTF-16 pattern.
const SNIFF_LEN: usize = 1024;

/// Returns the most likely encoding of `bytes`.
///
/// Never fails: input that is neither UTF-16 nor valid UTF-8 is taken as
/// windows-1252, which maps every byte. A wrong guess shows up later as row
/// errors, not as a failed job.
///
/// # Examples
///
/// ```
/// use alma_batch_rs::item::encoding::detect;
///
/// assert_eq!(detect(b"B001,note").name(), "UTF-8");
/// assert_eq!(detect(b"B001,caf\xe9").name(), "windows-1252");
/// assert_eq!(detect(b"\xff\xfeB\x000\x00").name(), "UTF-16LE");
/// ```
pub fn detect(bytes: &[u8]) -> &'static Encoding {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return encoding;
    }

    if let Some(encoding) = sniff_utf16(bytes) {
        return encoding;
    }

    if Encoding::utf8_valid_up_to(bytes) == bytes.len() {
        UTF_8
    } else {
        WINDOWS_1252
    }
}

/// Detects the encoding and decodes `bytes` to text, removing any BOM.
pub fn decode(bytes: &[u8]) -> (Cow<'_, str>, &'static Encoding) {
    let encoding = detect(bytes);
    debug!("Detected encoding: {}", encoding.name());

    let (text, had_errors) = encoding.decode_with_bom_removal(bytes);
    if had_errors {
        warn!(
            "Input is not valid {}; malformed sequences were replaced",
            encoding.name()
        );
    }

    (text, encoding)
}

/// ASCII text in UTF-16 has a NUL in every other byte.
fn sniff_utf16(bytes: &[u8]) -> Option<&'static Encoding> {
    let sample = &bytes[..bytes.len().min(SNIFF_LEN)];
    if sample.len() < 4 {
        return None;
    }

    let pairs = sample.len() / 2;
    let (mut even_nuls, mut odd_nuls) = (0usize, 0usize);
    for pair in sample.chunks_exact(2) {
        if pair[0] == 0 {
            even_nuls += 1;
        }
        if pair[1] == 0 {
            odd_nuls += 1;
        }
    }

    // at least 40% of one side and four times as many as on the other;
    // characters such as U+4E00 put the odd NUL on the other side
    if odd_nuls * 5 >= pairs * 2 && even_nuls * 4 <= odd_nuls {
        Some(UTF_16LE)
    } else if even_nuls * 5 >= pairs * 2 && odd_nuls * 4 <= even_nuls {
        Some(UTF_16BE)
    } else {
        None
    }
}
