use std::{
    fs::File,
    io::{self, Stderr, Write, stderr},
};

/// Output path given on the command line, `-` stands for standard error
#[derive(Debug, Clone)]
pub enum FileOrStderr {
    FilePath(String),
    Stderr,
}

impl ::core::fmt::Display for FileOrStderr {
    fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
        match self {
            Self::Stderr => write!(f, "-"),
            Self::FilePath(value) => write!(f, "{value}"),
        }
    }
}

impl From<String> for FileOrStderr {
    fn from(value: String) -> Self {
        if &value == "-" {
            Self::Stderr
        } else {
            Self::FilePath(value)
        }
    }
}

impl FileOrStderr {
    pub fn create(&self) -> io::Result<FileOrStderrWriter> {
        match self {
            Self::FilePath(fp) => Ok(FileOrStderrWriter::File(File::create(fp)?)),
            Self::Stderr => Ok(FileOrStderrWriter::Stderr(stderr())),
        }
    }
}

pub enum FileOrStderrWriter {
    File(File),
    Stderr(Stderr),
}

impl Write for FileOrStderrWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::File(f) => f.write(buf),
            Self::Stderr(fd) => fd.lock().write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::File(f) => f.flush(),
            Self::Stderr(fd) => fd.lock().flush(),
        }
    }
}
