//! MERL Reader

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};

/// Opens a MERL file for buffered reading.
///
/// * `path` - The file path.
pub fn open_file(path: &str) -> io::Result<BufReader<File>> {
    File::open(path).map(BufReader::new)
}

/// Creates a MERL file for buffered writing.
///
/// * `path` - The file path.
pub fn create_file(path: &str) -> io::Result<BufWriter<File>> {
    File::create(path).map(BufWriter::new)
}

/// Helpers for reading MERL BRDF files. The format is a header of three
/// little-endian `i32` dimensions followed by the samples as little-endian
/// `f64` values.
///
/// `NOTE`: This is just a convenience way to add helpers to any reader.
pub trait MerlReader {
    /// Reads the three header dimensions.
    fn read_dims(&mut self) -> io::Result<[i32; 3]>;

    /// Reads given number of 64-bit floating point values.
    ///
    /// * `count` - Number of values to read.
    fn read_f64_vec(&mut self, count: usize) -> io::Result<Vec<f64>>;
}

impl<R: Read> MerlReader for R {
    fn read_dims(&mut self) -> io::Result<[i32; 3]> {
        let mut dims = [0_i32; 3];
        self.read_i32_into::<LittleEndian>(&mut dims)?;
        Ok(dims)
    }

    fn read_f64_vec(&mut self, count: usize) -> io::Result<Vec<f64>> {
        let mut buffer: Vec<f64> = vec![0.0; count];
        self.read_f64_into::<LittleEndian>(&mut buffer)?;
        Ok(buffer)
    }
}

/// Counterpart of `MerlReader` for writing MERL BRDF files.
pub trait MerlWriter {
    /// Writes the three header dimensions.
    ///
    /// * `dims` - The dimensions.
    fn write_dims(&mut self, dims: [i32; 3]) -> io::Result<()>;

    /// Writes 64-bit floating point values.
    ///
    /// * `values` - The values.
    fn write_f64_slice(&mut self, values: &[f64]) -> io::Result<()>;
}

impl<W: Write> MerlWriter for W {
    fn write_dims(&mut self, dims: [i32; 3]) -> io::Result<()> {
        for d in dims {
            self.write_i32::<LittleEndian>(d)?;
        }
        Ok(())
    }

    fn write_f64_slice(&mut self, values: &[f64]) -> io::Result<()> {
        for v in values {
            self.write_f64::<LittleEndian>(*v)?;
        }
        Ok(())
    }
}
