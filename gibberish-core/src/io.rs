use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

use tempfile::NamedTempFile;

/// Streaming line reader over a text file.
///
/// Yields one line at a time so a corpus never has to be resident in memory.
/// Bytes that are not valid UTF-8 are decoded lossily, trailing `\n` / `\r\n`
/// are stripped.
pub(crate) struct LineReader {
	reader: BufReader<File>,
	buffer: Vec<u8>,
}

impl Iterator for LineReader {
	type Item = io::Result<String>;

	fn next(&mut self) -> Option<Self::Item> {
		self.buffer.clear();
		match self.reader.read_until(b'\n', &mut self.buffer) {
			Ok(0) => None,
			Ok(_) => {
				if self.buffer.last() == Some(&b'\n') {
					self.buffer.pop();
					if self.buffer.last() == Some(&b'\r') {
						self.buffer.pop();
					}
				}
				Some(Ok(String::from_utf8_lossy(&self.buffer).into_owned()))
			}
			Err(e) => Some(Err(e)),
		}
	}
}

/// Opens a text file for line-by-line reading.
///
/// The open happens eagerly, so a missing file or a path that is not a
/// regular file (a directory, for instance) is reported here rather than on
/// the first call to `next`.
pub(crate) fn read_lines<P: AsRef<Path>>(filename: P) -> io::Result<LineReader> {
	let file = File::open(filename)?;
	if !file.metadata()?.is_file() {
		return Err(io::Error::new(io::ErrorKind::InvalidInput, "not a regular file"));
	}
	Ok(LineReader { reader: BufReader::new(file), buffer: Vec::new() })
}

/// Reads a text file and returns all its lines as a `Vec<String>`.
///
/// Used when the whole corpus is split across workers.
pub(crate) fn read_file<P: AsRef<Path>>(filename: P) -> io::Result<Vec<String>> {
	read_lines(filename)?.collect()
}

/// Writes `bytes` to `path` atomically.
///
/// The data goes to a temporary file in the destination directory which is
/// then renamed over `path`, so readers never observe a half-written model.
pub(crate) fn write_atomic<P: AsRef<Path>>(path: P, bytes: &[u8]) -> io::Result<()> {
	let path = path.as_ref();
	let parent = match path.parent() {
		Some(p) if !p.as_os_str().is_empty() => p,
		_ => Path::new("."),
	};
	fs::create_dir_all(parent)?;

	let mut temp_file = NamedTempFile::new_in(parent)?;
	temp_file.write_all(bytes)?;
	temp_file.flush()?;
	temp_file.persist(path).map_err(|e| e.error)?;
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn strips_line_endings_and_decodes_lossily() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("corpus.txt");
		fs::write(&path, b"first line\r\nsecond\xffline\n\nlast").unwrap();

		let lines = read_file(&path).unwrap();
		assert_eq!(lines, vec!["first line", "second\u{fffd}line", "", "last"]);
	}

	#[test]
	fn missing_file_fails_on_open() {
		let dir = tempfile::tempdir().unwrap();
		assert!(read_lines(dir.path().join("nope.txt")).is_err());
	}

	#[test]
	fn directory_fails_on_open() {
		let dir = tempfile::tempdir().unwrap();
		let err = read_lines(dir.path()).err().unwrap();
		assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
	}

	#[test]
	fn atomic_write_creates_parent_and_replaces() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("nested").join("model.bin");

		write_atomic(&path, b"one").unwrap();
		write_atomic(&path, b"two").unwrap();
		assert_eq!(fs::read(&path).unwrap(), b"two");
	}
}
