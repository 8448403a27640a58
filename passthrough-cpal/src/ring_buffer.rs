/// Circular byte buffer between a cpal callback and the pump thread.
///
/// Not synchronized on its own; `BytePipe` wraps it in a mutex. Unlike a
/// sample ring that silently overwrites, writes here never exceed
/// `free()`. The owner decides whether to drop old bytes (`discard`) or to
/// wait for space.
#[derive(Debug)]
pub struct RingBuffer {
    buffer: Vec<u8>,
    write_index: usize,
    read_index: usize,
    available: usize,
    capacity: usize,
}

impl RingBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: vec![0; capacity],
            write_index: 0,
            read_index: 0,
            available: 0,
            capacity,
        }
    }

    /// Copy as much of `bytes` as fits. Returns the number accepted.
    pub fn write(&mut self, bytes: &[u8]) -> usize {
        let n = bytes.len().min(self.free());
        if n == 0 {
            return 0;
        }

        let first = n.min(self.capacity - self.write_index);
        self.buffer[self.write_index..self.write_index + first].copy_from_slice(&bytes[..first]);
        self.buffer[..n - first].copy_from_slice(&bytes[first..n]);

        self.write_index = (self.write_index + n) % self.capacity;
        self.available += n;
        n
    }

    /// Move up to `out.len()` bytes into `out`. Returns the number read.
    pub fn read_into(&mut self, out: &mut [u8]) -> usize {
        let n = out.len().min(self.available);
        if n == 0 {
            return 0;
        }

        let first = n.min(self.capacity - self.read_index);
        out[..first].copy_from_slice(&self.buffer[self.read_index..self.read_index + first]);
        out[first..n].copy_from_slice(&self.buffer[..n - first]);

        self.read_index = (self.read_index + n) % self.capacity;
        self.available -= n;
        n
    }

    /// Drop up to `count` of the oldest bytes. Returns the number dropped.
    pub fn discard(&mut self, count: usize) -> usize {
        let n = count.min(self.available);
        if n > 0 {
            self.read_index = (self.read_index + n) % self.capacity;
            self.available -= n;
        }
        n
    }

    /// Bytes currently available for reading.
    pub fn count(&self) -> usize {
        self.available
    }

    pub fn free(&self) -> usize {
        self.capacity - self.available
    }

    pub fn is_empty(&self) -> bool {
        self.available == 0
    }

    pub fn reset(&mut self) {
        self.write_index = 0;
        self.read_index = 0;
        self.available = 0;
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
