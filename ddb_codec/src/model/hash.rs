//! Partition-routing hash. Every function here must agree bit for bit with the server.

const M: u32 = 0x5bd1e995;
const R: u32 = 24;

/// For char, short and the int family. `is_min` marks the type's null sentinel.
pub fn hash_narrow_int(v: i64, is_min: bool, buckets: i32) -> i32 {
    let b = i64::from(buckets);
    if v >= 0 {
        (v % b) as i32
    } else if is_min {
        -1
    } else {
        ((v + 4_294_967_296) % b) as i32
    }
}

pub fn hash_long(v: i64, buckets: i32) -> i32 {
    let b = i64::from(buckets);
    if v >= 0 {
        (v % b) as i32
    } else if v == i64::MIN {
        -1
    } else {
        (((i64::MAX % b) + 2 + ((i64::MAX + v) % b)) % b) as i32
    }
}

fn mix_k(mut k: u32) -> u32 {
    k = k.wrapping_mul(M);
    k ^= k >> R;
    k.wrapping_mul(M)
}

fn mix_into(h: u32, k: u32) -> u32 {
    h.wrapping_mul(M) ^ mix_k(k)
}

fn finalize(mut h: u32) -> u32 {
    h ^= h >> 13;
    h = h.wrapping_mul(M);
    h ^ (h >> 15)
}

/// `[low, high]` words of an int128, uuid or ipaddr.
pub fn hash_long2([lo, hi]: [u64; 2], buckets: i32) -> i32 {
    let mut h: u32 = 16;
    for k in [lo as u32, (lo >> 32) as u32, hi as u32, (hi >> 32) as u32] {
        h = mix_into(h, k);
    }
    (i64::from(finalize(h)) % i64::from(buckets)) as i32
}

/// Length in modified UTF-8, where NUL takes two bytes.
fn modified_utf8_len(s: &str) -> usize {
    s.chars()
        .map(|c| match c as u32 {
            0x01..=0x7f => 1,
            0x00 | 0x80..=0x7ff => 2,
            _ => 3,
        })
        .sum()
}

pub fn hash_str(s: &str, buckets: i32) -> i32 {
    let byte_count = modified_utf8_len(s);
    let seed = byte_count as u32;
    let h = if byte_count == s.chars().count() {
        hash_ascii(s.as_bytes(), seed)
    } else {
        hash_multibyte(s, seed)
    };
    (i64::from(h) % i64::from(buckets)) as i32
}

fn hash_ascii(bytes: &[u8], mut h: u32) -> u32 {
    let mut chunks = bytes.chunks_exact(4);
    for c in &mut chunks {
        h = mix_into(h, u32::from_le_bytes([c[0], c[1], c[2], c[3]]));
    }
    let tail = chunks.remainder();
    if !tail.is_empty() {
        for (i, b) in tail.iter().enumerate().rev() {
            h ^= u32::from(*b) << (8 * i);
        }
        h = h.wrapping_mul(M);
    }
    finalize(h)
}

/// Feeds the modified-UTF-8 encoding one byte at a time, flushing every 4 bytes.
fn hash_multibyte(s: &str, mut h: u32) -> u32 {
    let mut k: u32 = 0;
    let mut cursor = 0;
    let mut feed = |byte: u32, h: &mut u32| {
        k = k.wrapping_add(byte << (8 * cursor));
        cursor += 1;
        if cursor == 4 {
            *h = mix_into(*h, k);
            k = 0;
            cursor = 0;
        }
    };
    for c in s.chars() {
        let c = c as u32;
        match c {
            0x01..=0x7f => feed(c, &mut h),
            0x00 | 0x80..=0x7ff => {
                feed(0xc0 | (0x1f & (c >> 6)), &mut h);
                feed(0x80 | (0x3f & c), &mut h);
            }
            _ => {
                feed(0xe0 | (0x0f & (c >> 12)), &mut h);
                feed(0x80 | (0x3f & (c >> 6)), &mut h);
                feed(0x80 | (0x3f & c), &mut h);
            }
        }
    }
    if cursor > 0 {
        h ^= k;
        h = h.wrapping_mul(M);
    }
    finalize(h)
}
