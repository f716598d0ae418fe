use anyhow::Result;
use encoding_rs::Encoding;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Legacy EDA exports are frequently Windows-1252 or similar, so the encoding is guessed from content.
pub fn read_with_unknown_encoding(path: &Path) -> Result<String> {
    let mut file = File::open(path)?;
    let size = file.metadata().map(|m| m.len() as usize).ok();
    let mut buf = Vec::new();
    buf.try_reserve_exact(size.unwrap_or(0))?;
    file.read_to_end(&mut buf)?;
    Ok(decode_unknown_encoding(&buf))
}

/// A byte order mark wins over detection.
pub fn decode_unknown_encoding(buf: &[u8]) -> String {
    if let Some((encoding, bom_len)) = Encoding::for_bom(buf) {
        return encoding
            .decode_without_bom_handling(&buf[bom_len..])
            .0
            .into_owned();
    }
    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(buf, true);
    let encoding = detector.guess(None, true);
    encoding.decode(buf).0.into_owned()
}
