use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::error::IndexError;
use crate::speaker::{Neighbor, SpeakerIndex};

/// Binary format magic and version.
const FLAT_MAGIC: [u8; 4] = [b'R', b'V', b'S', b'I'];
const FLAT_VERSION: u32 = 1;

/// Exact nearest-neighbor index over dense f32 vectors, brute-force
/// squared-L2. Vectors are stored contiguously so reconstruction is a
/// slice borrow.
///
/// Intended for speaker feature banks up to a few hundred thousand frames;
/// larger banks belong behind an external ANN implementation of
/// [`SpeakerIndex`].
pub struct FlatIndex {
    dim: usize,
    data: Vec<f32>,
}

impl FlatIndex {
    /// Creates an empty index for vectors of the given dimension.
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            data: Vec::new(),
        }
    }

    /// Appends a vector to the index.
    pub fn add(&mut self, vector: &[f32]) -> Result<(), IndexError> {
        if vector.len() != self.dim {
            return Err(IndexError::DimensionMismatch {
                got: vector.len(),
                want: self.dim,
            });
        }
        self.data.extend_from_slice(vector);
        Ok(())
    }

    /// Serializes the index in a compact binary format:
    ///
    /// ```text
    /// [4B magic "RVSI"] [4B version=1]
    /// [4B dim] [4B count]
    /// [count x dim x 4B float32]
    /// ```
    ///
    /// All multi-byte values are little-endian.
    pub fn save(&self, w: &mut dyn Write) -> Result<(), IndexError> {
        let mut bw = BufWriter::new(w);
        let write_err = |e: std::io::Error| IndexError::Io(e.to_string());

        bw.write_all(&FLAT_MAGIC).map_err(write_err)?;
        bw.write_all(&FLAT_VERSION.to_le_bytes()).map_err(write_err)?;
        bw.write_all(&(self.dim as u32).to_le_bytes()).map_err(write_err)?;
        bw.write_all(&(self.len() as u32).to_le_bytes()).map_err(write_err)?;
        for &v in &self.data {
            bw.write_all(&v.to_le_bytes()).map_err(write_err)?;
        }
        bw.flush().map_err(write_err)
    }

    /// Deserializes an index from a reader. The declared count must match
    /// the payload exactly.
    pub fn load(r: &mut dyn Read) -> Result<Self, IndexError> {
        let mut br = BufReader::new(r);
        let read_err = |e: std::io::Error| IndexError::Io(e.to_string());

        let mut buf4 = [0u8; 4];
        br.read_exact(&mut buf4).map_err(read_err)?;
        if buf4 != FLAT_MAGIC {
            return Err(IndexError::InvalidFormat(format!("invalid magic {buf4:?}")));
        }

        br.read_exact(&mut buf4).map_err(read_err)?;
        let version = u32::from_le_bytes(buf4);
        if version != FLAT_VERSION {
            return Err(IndexError::InvalidFormat(format!(
                "unsupported version {version} (want {FLAT_VERSION})"
            )));
        }

        br.read_exact(&mut buf4).map_err(read_err)?;
        let dim = u32::from_le_bytes(buf4) as usize;
        if dim == 0 {
            return Err(IndexError::InvalidFormat("invalid dimension 0".into()));
        }

        br.read_exact(&mut buf4).map_err(read_err)?;
        let count = u32::from_le_bytes(buf4) as usize;

        // The header is untrusted: read the payload incrementally so a
        // lying count fails on EOF instead of sizing an allocation from
        // `count * dim`.
        let total = count as u64 * dim as u64;
        let mut data: Vec<f32> = Vec::with_capacity(total.min(1 << 20) as usize);
        for _ in 0..total {
            let mut fb = [0u8; 4];
            br.read_exact(&mut fb).map_err(|e| {
                IndexError::InvalidFormat(format!(
                    "payload shorter than declared {count} x {dim} vectors: {e}"
                ))
            })?;
            data.push(f32::from_le_bytes(fb));
        }

        // Trailing bytes mean the header lied about the count.
        let mut probe = [0u8; 1];
        match br.read(&mut probe) {
            Ok(0) => {}
            Ok(_) => {
                return Err(IndexError::InvalidFormat(
                    "trailing data after declared vectors".into(),
                ))
            }
            Err(e) => return Err(read_err(e)),
        }

        Ok(Self { dim, data })
    }

    /// Loads an index from a file path.
    pub fn load_path(path: &Path) -> Result<Self, IndexError> {
        let mut file = File::open(path)
            .map_err(|e| IndexError::Io(format!("{}: {e}", path.display())))?;
        Self::load(&mut file)
    }

    fn vector(&self, i: usize) -> &[f32] {
        &self.data[i * self.dim..(i + 1) * self.dim]
    }
}

impl SpeakerIndex for FlatIndex {
    fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>, IndexError> {
        if query.len() != self.dim {
            return Err(IndexError::DimensionMismatch {
                got: query.len(),
                want: self.dim,
            });
        }
        if self.is_empty() {
            return Err(IndexError::Empty);
        }

        let mut results: Vec<Neighbor> = (0..self.len())
            .map(|i| {
                let mut d = 0.0f64;
                for (a, b) in self.vector(i).iter().zip(query.iter()) {
                    let diff = (*a - *b) as f64;
                    d += diff * diff;
                }
                Neighbor {
                    id: i as u32,
                    distance: d as f32,
                }
            })
            .collect();

        results.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(k);
        Ok(results)
    }

    fn reconstruct(&self, id: u32) -> Result<&[f32], IndexError> {
        if (id as usize) >= self.len() {
            return Err(IndexError::IdOutOfBounds {
                id,
                len: self.len(),
            });
        }
        Ok(self.vector(id as usize))
    }

    fn dimension(&self) -> usize {
        self.dim
    }

    fn len(&self) -> usize {
        if self.dim == 0 {
            0
        } else {
            self.data.len() / self.dim
        }
    }
}
