use std::io::{self, BufRead};

/// Reads through `byte` and drops it from `buf`.
/// Returns whether `byte` was seen before the source ran dry.
pub fn read_until_then_trim(r: &mut impl BufRead, byte: u8, buf: &mut Vec<u8>) -> io::Result<bool> {
    let r_len = r.read_until(byte, buf)?;
    if r_len > 0 && buf.last() == Some(&byte) {
        buf.pop();
        return Ok(true);
    }
    Ok(false)
}
