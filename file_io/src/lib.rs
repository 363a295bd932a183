use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter};
use std::path::Path;

pub fn create_file_buf_write<P: AsRef<Path>>(path: P) -> io::Result<BufWriter<File>> {
    let file = File::create(path)?;
    Ok(BufWriter::new(file))
}

pub fn open_file_buf_read<P: AsRef<Path>>(path: P) -> io::Result<BufReader<File>> {
    let file = File::open(path)?;
    Ok(BufReader::new(file))
}

pub fn has_data_left<R: BufRead>(mut reader: R) -> io::Result<bool> {
    reader.fill_buf().map(|buf| !buf.is_empty())
}

pub fn ensure_dir_exists<P: AsRef<Path>>(path: P) -> io::Result<()> {
    fs::create_dir_all(path)
}
