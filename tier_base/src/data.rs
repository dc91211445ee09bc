//! Part data file codec
//! 数据块文件编解码
//!
//! Format: magic(4) + version(1) + row_count(8) + rows + crc32(4)
//! Row: col_count(2) + { name_len(2) + name + ts(8) }* + val_len(4) + val
//! 格式：魔数(4) + 版本(1) + 行数(8) + 行 + crc32(4)

use std::io;

use bytes::Bytes;

use crate::{Row, Time};

/// Data file name inside a part directory / 数据块目录内的数据文件名
pub const DATA_FILE: &str = "data";

/// "TPRT"
const MAGIC: u32 = 0x5450_5254;
const VERSION: u8 = 1;

/// Encode rows with trailing crc32 / 编码行并附加 crc32
pub fn encode_rows(rows: &[Row]) -> Vec<u8> {
  let mut buf = Vec::with_capacity(64 * rows.len() + 17);
  buf.extend_from_slice(&MAGIC.to_le_bytes());
  buf.push(VERSION);
  buf.extend_from_slice(&(rows.len() as u64).to_le_bytes());
  for row in rows {
    buf.extend_from_slice(&(row.cols.len() as u16).to_le_bytes());
    for (name, ts) in &row.cols {
      buf.extend_from_slice(&(name.len() as u16).to_le_bytes());
      buf.extend_from_slice(name.as_bytes());
      buf.extend_from_slice(&ts.to_le_bytes());
    }
    buf.extend_from_slice(&(row.val.len() as u32).to_le_bytes());
    buf.extend_from_slice(&row.val);
  }
  let crc = crc32fast::hash(&buf);
  buf.extend_from_slice(&crc.to_le_bytes());
  buf
}

fn bad(msg: &str) -> io::Error {
  io::Error::new(io::ErrorKind::InvalidData, msg.to_owned())
}

struct Reader<'a> {
  buf: &'a [u8],
  pos: usize,
}

impl<'a> Reader<'a> {
  fn take(&mut self, n: usize) -> io::Result<&'a [u8]> {
    let end = self.pos.checked_add(n).ok_or_else(|| bad("overflow"))?;
    if end > self.buf.len() {
      return Err(bad("truncated part data"));
    }
    let s = &self.buf[self.pos..end];
    self.pos = end;
    Ok(s)
  }

  fn u16(&mut self) -> io::Result<u16> {
    Ok(u16::from_le_bytes(self.take(2)?.try_into().unwrap()))
  }

  fn u32(&mut self) -> io::Result<u32> {
    Ok(u32::from_le_bytes(self.take(4)?.try_into().unwrap()))
  }

  fn u64(&mut self) -> io::Result<u64> {
    Ok(u64::from_le_bytes(self.take(8)?.try_into().unwrap()))
  }

  fn i64(&mut self) -> io::Result<i64> {
    Ok(i64::from_le_bytes(self.take(8)?.try_into().unwrap()))
  }
}

/// Decode a data file, checking magic, version and crc32
/// 解码数据文件，校验魔数、版本与 crc32
pub fn decode_rows(buf: &[u8]) -> io::Result<Vec<Row>> {
  if buf.len() < 17 {
    return Err(bad("part data too short"));
  }
  let (body, tail) = buf.split_at(buf.len() - 4);
  let crc = u32::from_le_bytes(tail.try_into().unwrap());
  if crc32fast::hash(body) != crc {
    return Err(bad("part data crc mismatch"));
  }

  let mut r = Reader { buf: body, pos: 0 };
  if r.u32()? != MAGIC {
    return Err(bad("bad part data magic"));
  }
  let [version] = r.take(1)? else { unreachable!() };
  if *version != VERSION {
    return Err(bad("unsupported part data version"));
  }

  let count = r.u64()? as usize;
  let mut rows = Vec::with_capacity(count.min(1 << 20));
  for _ in 0..count {
    let cols = r.u16()? as usize;
    let mut row = Row {
      cols: Default::default(),
      val: Bytes::new(),
    };
    for _ in 0..cols {
      let name_len = r.u16()? as usize;
      let name = std::str::from_utf8(r.take(name_len)?)
        .map_err(|_| bad("bad column name"))?
        .to_owned();
      let ts: Time = r.i64()?;
      row.cols.insert(name, ts);
    }
    let val_len = r.u32()? as usize;
    row.val = Bytes::copy_from_slice(r.take(val_len)?);
    rows.push(row);
  }
  Ok(rows)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn codec_roundtrip() {
    let rows = vec![
      Row::new("d", 1000, &b"alpha"[..]).with("e", 2000),
      Row::new("d", -5, &b""[..]),
    ];
    let buf = encode_rows(&rows);
    assert_eq!(decode_rows(&buf).unwrap(), rows);
  }

  #[test]
  fn corrupt_crc_rejected() {
    let mut buf = encode_rows(&[Row::new("d", 1, &b"x"[..])]);
    let last = buf.len() - 1;
    buf[last] ^= 0xff;
    assert!(decode_rows(&buf).is_err());
  }

  #[test]
  fn truncated_rejected() {
    let buf = encode_rows(&[Row::new("d", 1, &b"x"[..])]);
    assert!(decode_rows(&buf[..buf.len() - 6]).is_err());
  }
}
