use std::io::{self, Read};

use anyhow::{ensure, Context, Result};
use zip::{read::ZipFile, ZipArchive};

pub struct ZipReader<R> {
    archive: ZipArchive<R>,
}

impl<R: Read + io::Seek> ZipReader<R> {
    pub fn new(reader: R) -> Result<ZipReader<R>> {
        let archive = ZipArchive::new(reader).context("Failed to open")?;
        Ok(ZipReader { archive })
    }

    pub fn len(&self) -> usize {
        self.archive.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get_by_index(&mut self, index: usize) -> Result<ZipEntry<'_>> {
        self.archive
            .by_index(index)
            .with_context(|| format!("Failed to open at {}", index))
            .map(|file| ZipEntry { file })
    }

    // 青空文庫の zip には .txt が 1 つだけ入っている
    pub fn read_single_txt(&mut self) -> Result<Vec<u8>> {
        let mut txt_bytes = None;
        for i in 0..self.len() {
            let mut entry = self.get_by_index(i)?;
            if !entry.name().to_lowercase().ends_with(".txt") {
                continue;
            }

            ensure!(txt_bytes.is_none(), ".txt file exists more than 1");

            txt_bytes = Some(entry.as_bytes()?);
        }

        txt_bytes.context(".txt file is not found")
    }
}

pub struct ZipEntry<'a> {
    file: ZipFile<'a>,
}

impl ZipEntry<'_> {
    pub fn name(&self) -> &str {
        self.file.name()
    }

    pub fn as_bytes(&mut self) -> Result<Vec<u8>> {
        let mut data = Vec::<u8>::new();
        self.file
            .read_to_end(&mut data)
            .with_context(|| format!("Failed to read {}", self.name()))?;

        Ok(data)
    }
}
