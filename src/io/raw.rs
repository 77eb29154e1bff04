//! Read / write float arrays as raw binary (little-endian f32)

use std::fs::File;
use std::io::{Write, Read, BufWriter, BufReader};

pub fn write(data: impl Iterator<Item = f32>, path: &std::path::Path) -> std::io::Result<()> {
    let file = File::create(path)?;
    let mut buf = BufWriter::new(file);
    for datum in data {
        buf.write_all(&datum.to_le_bytes())?;
    }
    Ok(())
}

type IORes<T> = std::io::Result<T>;
pub fn read<'a>(path: &std::path::Path) -> IORes<impl Iterator<Item = IORes<f32>> + 'a> {
    let file = File::open(path)?;
    let mut buf = BufReader::new(file);
    let mut buffer = [0; 4];

    Ok(std::iter::from_fn(move || {
        use std::io::ErrorKind::UnexpectedEof;
        match buf.read_exact(&mut buffer) {
            Ok(()) => Some(Ok(f32::from_le_bytes(buffer))),
            Err(e) if e.kind() == UnexpectedEof => None,
            Err(e) => Some(Err(e)),
        }
    }))
}

/// Load a square image of side `n` from a raw f32 file.
pub fn load_image(path: &std::path::Path, n: usize) -> crate::Result<crate::Image> {
    let data: Vec<f32> = read(path)?.collect::<Result<_, _>>()?;
    crate::Image::new(n, data)
}
