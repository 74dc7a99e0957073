use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::Error;

/// Reads a whole ROM image. Length is checked when the image is loaded into
/// the machine, not here.
pub fn read<P: AsRef<Path>>(path: P) -> Result<Vec<u8>, Error> {
    let path = path.as_ref();
    let io_error = |source| Error::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::open(path).map_err(io_error)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(io_error)?;

    log::info!("read {} bytes from {}", bytes.len(), path.display());
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_read_whole_file() {
        let path = std::env::temp_dir().join(format!("chip8-rom-{}.ch8", std::process::id()));
        fs::write(&path, [0x00u8, 0xE0, 0x12, 0x00]).unwrap();

        let bytes = read(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(bytes, vec![0x00, 0xE0, 0x12, 0x00]);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let path = std::env::temp_dir().join("chip8-no-such-rom.ch8");
        match read(&path) {
            Err(Error::Io { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected io error, got {:?}", other),
        }
    }
}
