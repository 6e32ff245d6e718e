//! Fake I2C bus for driver tests
//!
//! Emulates devices at fixed addresses: records every write and serves
//! reads from a small memory with an auto-incrementing address pointer,
//! the way an I2C EEPROM behaves.

use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};
use heapless::Vec;

pub const MAX_FRAME: usize = 40;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub address: u8,
    pub bytes: Vec<u8, MAX_FRAME>,
}

pub struct FakeI2c {
    /// Addresses that acknowledge
    pub present: Vec<u8, 4>,
    /// Writes in order
    pub frames: Vec<Frame, 256>,
    /// Backing memory for reads
    pub memory: [u8; 512],
    /// Address-pointer width in bytes for reads (0 = reads start at 0)
    pub pointer_bytes: usize,
    pointer: usize,
    /// Fail this many transactions with a NACK before succeeding
    pub nack_next: usize,
    /// NACKs returned after each memory write, emulating the write cycle
    pub busy_polls: usize,
}

impl FakeI2c {
    pub fn new(present: &[u8]) -> Self {
        Self {
            present: Vec::from_slice(present).unwrap(),
            frames: Vec::new(),
            memory: [0xFF; 512],
            pointer_bytes: 0,
            pointer: 0,
            nack_next: 0,
            busy_polls: 0,
        }
    }

    pub fn writes_to(&self, address: u8) -> impl Iterator<Item = &[u8]> + '_ {
        self.frames
            .iter()
            .filter(move |f| f.address == address)
            .map(|f| f.bytes.as_slice())
    }
}

impl ErrorType for FakeI2c {
    type Error = ErrorKind;
}

impl I2c for FakeI2c {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        if self.nack_next > 0 {
            self.nack_next -= 1;
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }
        if !self.present.contains(&address) {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }

        for op in operations {
            match op {
                Operation::Write(bytes) => {
                    let frame = Frame {
                        address,
                        bytes: Vec::from_slice(bytes).unwrap(),
                    };
                    self.frames.push(frame).unwrap();

                    if self.pointer_bytes > 0 && bytes.len() >= self.pointer_bytes {
                        let (ptr, data) = bytes.split_at(self.pointer_bytes);
                        let mut addr = 0usize;
                        for b in ptr {
                            addr = (addr << 8) | *b as usize;
                        }
                        for (i, b) in data.iter().enumerate() {
                            self.memory[(addr + i) % self.memory.len()] = *b;
                        }
                        self.pointer = addr + data.len();
                        if !data.is_empty() {
                            self.nack_next = self.busy_polls;
                        }
                    }
                }
                Operation::Read(buffer) => {
                    for b in buffer.iter_mut() {
                        *b = self.memory[self.pointer % self.memory.len()];
                        self.pointer += 1;
                    }
                }
            }
        }
        Ok(())
    }
}
