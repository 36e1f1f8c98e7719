//! NPY header definitions: preamble, descriptor dict, and padding.

use std::io::{self, Read};

use crate::error::{LifeError, Result};

/// Magic bytes opening every NPY file.
pub const NPY_MAGIC: &[u8; 6] = b"\x93NUMPY";

/// Total header size (preamble + dict + padding) written for snapshot stacks.
pub const STACK_HEADER_LEN: usize = 128;

/// Headers longer than `STACK_HEADER_LEN` grow in steps of this size.
const HEADER_ALIGN: usize = 64;

/// Preamble size for version 1.x: magic(6) + version(2) + u16 length(2).
pub const PREAMBLE_LEN_V1: usize = 10;

/// Preamble size for versions 2.x and 3.x: magic(6) + version(2) + u32 length(4).
pub const PREAMBLE_LEN_V2: usize = 12;

/// Element type written for every array.
pub const U1_DESCR: &str = "<u1";

/// Parsed NPY array descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NpyHeader {
    /// Numpy dtype string, e.g. `<u1` or `|b1`.
    pub descr: String,
    /// Column-major data. Only `false` is supported for reading.
    pub fortran_order: bool,
    /// Array dimensions, outermost first.
    pub shape: Vec<usize>,
}

impl NpyHeader {
    /// Header for a C-ordered `u1` array.
    pub fn u1(shape: &[usize]) -> Self {
        Self {
            descr: U1_DESCR.to_owned(),
            fortran_order: false,
            shape: shape.to_vec(),
        }
    }

    /// Number of elements the shape describes.
    pub fn element_count(&self) -> Result<usize> {
        self.shape
            .iter()
            .try_fold(1usize, |acc, &d| acc.checked_mul(d))
            .ok_or_else(|| LifeError::Shape(format!("{:?} overflows", self.shape)))
    }

    /// Fail unless elements are single bytes stored in C order.
    pub fn check_byte_elements(&self) -> Result<()> {
        let kind = self
            .descr
            .strip_prefix(['|', '<', '>', '='])
            .unwrap_or(&self.descr);
        if kind != "u1" && kind != "b1" {
            return Err(LifeError::Format(format!(
                "element type '{}' is not a 1-byte unsigned integer",
                self.descr
            )));
        }
        if self.fortran_order {
            return Err(LifeError::Format(
                "Fortran-ordered arrays are not supported".to_owned(),
            ));
        }
        Ok(())
    }

    /// Render the descriptor dict exactly as numpy lays it out.
    pub fn dict(&self) -> String {
        let shape = match self.shape.as_slice() {
            [n] => format!("({},)", n),
            dims => format!(
                "({})",
                dims.iter()
                    .map(|d| d.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        };
        format!(
            "{{'descr': '{}', 'fortran_order': {}, 'shape': {}, }}",
            self.descr,
            if self.fortran_order { "True" } else { "False" },
            shape
        )
    }

    /// Encode a version 1.0 header block.
    ///
    /// The block is `STACK_HEADER_LEN` bytes when the dict fits, otherwise the
    /// next multiple of 64. It is space padded and ends in a newline.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let dict = self.dict();
        let min_len = PREAMBLE_LEN_V1 + dict.len() + 1;
        let total = if min_len <= STACK_HEADER_LEN {
            STACK_HEADER_LEN
        } else {
            min_len.div_ceil(HEADER_ALIGN) * HEADER_ALIGN
        };
        let header_len = u16::try_from(total - PREAMBLE_LEN_V1).map_err(|_| {
            LifeError::Shape(format!("header for {:?} is too long", self.shape))
        })?;

        let mut out = Vec::with_capacity(total);
        out.extend_from_slice(NPY_MAGIC);
        out.extend_from_slice(&[1, 0]);
        out.extend_from_slice(&header_len.to_le_bytes());
        out.extend_from_slice(dict.as_bytes());
        out.resize(total - 1, b' ');
        out.push(b'\n');
        Ok(out)
    }

    /// Read and parse the header, returning it with the data offset.
    pub fn read_from<R: Read>(r: &mut R) -> Result<(Self, usize)> {
        let mut magic = [0u8; 6];
        read_header_bytes(r, &mut magic)?;
        if &magic != NPY_MAGIC {
            return Err(LifeError::Format("missing NPY magic bytes".to_owned()));
        }

        let mut version = [0u8; 2];
        read_header_bytes(r, &mut version)?;

        let (preamble, header_len) = match version[0] {
            1 => {
                let mut buf2 = [0u8; 2];
                read_header_bytes(r, &mut buf2)?;
                (PREAMBLE_LEN_V1, u16::from_le_bytes(buf2) as usize)
            }
            2 | 3 => {
                let mut buf4 = [0u8; 4];
                read_header_bytes(r, &mut buf4)?;
                (PREAMBLE_LEN_V2, u32::from_le_bytes(buf4) as usize)
            }
            major => {
                return Err(LifeError::Format(format!(
                    "unsupported NPY version {}.{}",
                    major, version[1]
                )));
            }
        };

        let mut dict = vec![0u8; header_len];
        read_header_bytes(r, &mut dict)?;
        let dict = std::str::from_utf8(&dict)
            .map_err(|_| LifeError::Format("header is not valid text".to_owned()))?;

        Ok((Self::parse_dict(dict)?, preamble + header_len))
    }

    /// Parse the descriptor dict, e.g.
    /// `{'descr': '<u1', 'fortran_order': False, 'shape': (3, 4), }`.
    pub fn parse_dict(text: &str) -> Result<Self> {
        let text = text.trim();
        if !text.starts_with('{') {
            return Err(LifeError::Format(format!(
                "header is not a dict: {:?}",
                text
            )));
        }

        Ok(Self {
            descr: parse_quoted(dict_entry(text, "descr")?)?,
            fortran_order: parse_bool(dict_entry(text, "fortran_order")?)?,
            shape: parse_shape(dict_entry(text, "shape")?)?,
        })
    }
}

fn read_header_bytes<R: Read>(r: &mut R, buf: &mut [u8]) -> Result<()> {
    r.read_exact(buf).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => LifeError::Format("truncated header".to_owned()),
        _ => LifeError::Io {
            context: "reading NPY header".to_owned(),
            source: e,
        },
    })
}

/// Slice of `dict` starting at the value for `key`.
fn dict_entry<'a>(dict: &'a str, key: &str) -> Result<&'a str> {
    for quote in ['\'', '"'] {
        let needle = format!("{quote}{key}{quote}");
        if let Some(pos) = dict.find(&needle) {
            let rest = dict[pos + needle.len()..].trim_start();
            if let Some(value) = rest.strip_prefix(':') {
                return Ok(value.trim_start());
            }
        }
    }
    Err(LifeError::Format(format!("header has no '{}' entry", key)))
}

fn parse_quoted(value: &str) -> Result<String> {
    let bad = || LifeError::Format(format!("malformed descr: {:?}", value));
    let quote = value.chars().next().filter(|c| *c == '\'' || *c == '"').ok_or_else(bad)?;
    let body = &value[1..];
    let end = body.find(quote).ok_or_else(bad)?;
    Ok(body[..end].to_owned())
}

fn parse_bool(value: &str) -> Result<bool> {
    if value.starts_with("True") {
        Ok(true)
    } else if value.starts_with("False") {
        Ok(false)
    } else {
        Err(LifeError::Format(format!(
            "malformed fortran_order: {:?}",
            value
        )))
    }
}

fn parse_shape(value: &str) -> Result<Vec<usize>> {
    let bad = || LifeError::Format(format!("malformed shape: {:?}", value));
    let inner = value.strip_prefix('(').ok_or_else(bad)?;
    let end = inner.find(')').ok_or_else(bad)?;
    inner[..end]
        .split(',')
        .map(str::trim)
        .filter(|dim| !dim.is_empty())
        .map(|dim| dim.trim_end_matches('L').parse::<usize>().map_err(|_| bad()))
        .collect()
}
