use crate::utils::CONFIG_FILE_EXT;
use log::{debug, error};
use path_clean::PathClean;
use std::fs;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

const IO_BUFFER_SIZE: usize = 64 * 1024;

pub fn file_writer<W>(w: W) -> std::io::BufWriter<W>
where
    W: Write,
{
    std::io::BufWriter::with_capacity(IO_BUFFER_SIZE, w)
}

pub fn file_reader<R>(r: R) -> std::io::BufReader<R>
where
    R: std::io::Read,
{
    std::io::BufReader::with_capacity(IO_BUFFER_SIZE, r)
}

pub fn open_file(file_name: &Path) -> Result<File, std::io::Error> {
    File::open(file_name)
}

/// Resolves `path` against the working directory. Absolute paths are returned unchanged.
pub fn get_file_path(wd: &Path, path: &str) -> PathBuf {
    let p = PathBuf::from(path);
    if p.is_relative() {
        wd.join(&p).clean()
    } else {
        p
    }
}

pub fn get_default_config_path(wd: &Path, name: &str) -> PathBuf {
    wd.join(format!("{name}.{CONFIG_FILE_EXT}"))
}

pub fn ensure_directory(path: &Path) -> Result<(), std::io::Error> {
    if path.is_dir() {
        Ok(())
    } else {
        fs::create_dir_all(path)
    }
}

/// `file_name` contains a `{}` placeholder which is replaced by the current timestamp.
pub fn prepare_persist_path(dir: &Path, file_name: &str) -> PathBuf {
    let now = chrono::Local::now();
    dir.join(file_name.replace("{}", now.format("%Y%m%d_%H%M%S").to_string().as_str()))
}

pub fn persist_file(path: &Path, content: &[u8]) -> bool {
    let filename = path.to_str().unwrap_or("?");
    let result = File::create(path).and_then(|file| {
        let mut writer = file_writer(file);
        writer.write_all(content)?;
        writer.flush()
    });
    match result {
        Ok(()) => {
            debug!("persisted: {filename}");
            true
        }
        Err(e) => {
            error!("failed to persist file {filename}, {e}");
            false
        }
    }
}

pub fn remove_files(files: &[PathBuf]) {
    for file in files {
        match fs::remove_file(file) {
            Ok(()) => debug!("removed: {}", file.display()),
            Err(e) => error!("failed to remove file {}, {e}", file.display()),
        }
    }
}

pub fn write_lines<'a, I>(path: &Path, lines: I) -> Result<(), std::io::Error>
where
    I: IntoIterator<Item=&'a PathBuf>,
{
    let mut writer = file_writer(File::create(path)?);
    for line in lines {
        writeln!(writer, "{}", line.display())?;
    }
    writer.flush()
}
