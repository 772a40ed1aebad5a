use std::io::{self, Cursor};

use byteorder::{BigEndian, ReadBytesExt};

use crate::{ClassFileError, Result};

type Endian = BigEndian;

/// Forward-only big-endian reader over a borrowed byte buffer.
///
/// Offsets reported in errors are absolute: a reader created with [`Reader::sub_reader`]
/// remembers where its slice started in the outermost buffer.
pub struct Reader<'a> {
    r: Cursor<&'a [u8]>,
    base: usize,
}
impl<'a> Reader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self::with_base(buf, 0)
    }

    fn with_base(buf: &'a [u8], base: usize) -> Self {
        Self {
            r: Cursor::new(buf),
            base,
        }
    }

    pub fn position(&self) -> usize {
        self.base + self.r.position() as usize
    }

    pub fn remaining(&self) -> usize {
        self.r.get_ref().len() - self.r.position() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.read(1, |r| r.read_u8())
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        self.read(2, |r| r.read_u16::<Endian>())
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        self.read(4, |r| r.read_u32::<Endian>())
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        self.read(4, |r| r.read_i32::<Endian>())
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        self.read(4, |r| r.read_f32::<Endian>())
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        self.read(8, |r| r.read_f64::<Endian>())
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.ensure(n)?;
        let start = self.r.position() as usize;
        let buf: &'a [u8] = *self.r.get_ref();
        self.r.set_position((start + n) as u64);

        Ok(&buf[start..start + n])
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut array = [0u8; N];
        array.copy_from_slice(self.read_bytes(N)?);
        Ok(array)
    }

    /// Reads `n` bytes of modified UTF-8.
    pub fn read_string(&mut self, n: usize) -> Result<String> {
        let offset = self.position();
        let bytes = self.read_bytes(n)?;

        cesu8::from_java_cesu8(bytes)
            .map(|s| s.into_owned())
            .map_err(|_| ClassFileError::MalformedModifiedUtf8 { offset })
    }

    /// Slices off the next `n` bytes into an independent reader and skips them here.
    pub fn sub_reader(&mut self, n: usize) -> Result<Reader<'a>> {
        let base = self.position();
        let bytes = self.read_bytes(n)?;

        Ok(Reader::with_base(bytes, base))
    }

    fn ensure(&self, requested: usize) -> Result<()> {
        let remaining = self.remaining();
        if requested > remaining {
            return Err(ClassFileError::OutOfBounds {
                offset: self.position(),
                requested,
                remaining,
            });
        }

        Ok(())
    }

    fn read<T>(
        &mut self,
        width: usize,
        f: impl FnOnce(&mut Cursor<&'a [u8]>) -> io::Result<T>,
    ) -> Result<T> {
        self.ensure(width)?;
        let offset = self.position();

        f(&mut self.r).map_err(|_| ClassFileError::OutOfBounds {
            offset,
            requested: width,
            remaining: 0,
        })
    }
}
