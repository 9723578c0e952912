use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::time::Instant;

const SLOT_COUNT: usize = 8;

enum Slot {
    Empty,
    Stdin,
    Stdout,
    Stderr,
    Reader(BufReader<File>),
    Writer(File),
}

/// The process-wide resources intrinsics touch: the file-handle table,
/// the program's own command-line arguments, and the clock reference point.
///
/// Kept as an explicit object passed into the interpreter at construction
/// rather than global statics, so nothing outside an intrinsic call can
/// observe or mutate a handle table behind the interpreter's back.
pub struct HostServices {
    slots: [Slot; SLOT_COUNT],
    args: Vec<String>,
    arg_cursor: usize,
    start: Instant,
}

impl HostServices {
    pub fn new(args: Vec<String>) -> Self {
        Self {
            slots: [
                Slot::Stdin,
                Slot::Stdout,
                Slot::Stderr,
                Slot::Empty,
                Slot::Empty,
                Slot::Empty,
                Slot::Empty,
                Slot::Empty,
            ],
            args,
            arg_cursor: 0,
            start: Instant::now(),
        }
    }

    pub fn clock(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }

    pub fn argc(&self) -> usize {
        self.args.len()
    }

    /// Returns the next script argument in order, advancing the cursor;
    /// `None` once the arguments are exhausted and every call after.
    ///
    /// `_argv` is registered with arity 0 (`_argc` / `_argv` = 1 / 0, per the
    /// intrinsics table), so it has no index to pull a specific argument by —
    /// a program enumerates arguments with repeated `_argv()` calls instead.
    pub fn next_arg(&mut self) -> Option<&str> {
        let arg = self.args.get(self.arg_cursor).map(String::as_str);
        if self.arg_cursor < self.args.len() {
            self.arg_cursor += 1;
        }
        arg
    }

    /// Opens `path` for reading, returning the handle it was assigned, or
    /// `None` if there was no free slot or the open failed.
    pub fn open_read(&mut self, path: &str) -> Option<u8> {
        let file = File::open(path).ok()?;
        let slot = self.free_slot()?;
        self.slots[slot] = Slot::Reader(BufReader::new(file));
        Some(slot as u8)
    }

    /// Opens `path` for writing (truncating), returning the assigned handle.
    pub fn open_write(&mut self, path: &str) -> Option<u8> {
        let file = File::create(path).ok()?;
        let slot = self.free_slot()?;
        self.slots[slot] = Slot::Writer(file);
        Some(slot as u8)
    }

    pub fn close(&mut self, handle: u8) -> bool {
        match self.slot_mut(handle) {
            Some(slot @ (Slot::Reader(_) | Slot::Writer(_))) => {
                *slot = Slot::Empty;
                true
            }
            _ => false,
        }
    }

    /// Reads one byte from `handle`. `None` on EOF, a closed handle, or I/O error.
    pub fn get_byte(&mut self, handle: u8) -> Option<u8> {
        match self.slot_mut(handle)? {
            Slot::Stdin => {
                let mut buf = [0u8; 1];
                let n = io::stdin().lock().read(&mut buf).ok()?;
                (n == 1).then_some(buf[0])
            }
            Slot::Reader(reader) => {
                let mut buf = [0u8; 1];
                let n = reader.read(&mut buf).ok()?;
                (n == 1).then_some(buf[0])
            }
            _ => None,
        }
    }

    /// Writes one byte to `handle`. Returns whether the write succeeded.
    pub fn put_byte(&mut self, handle: u8, byte: u8) -> bool {
        match self.slot_mut(handle) {
            Some(Slot::Stdout) => io::stdout().lock().write_all(&[byte]).is_ok(),
            Some(Slot::Stderr) => io::stderr().lock().write_all(&[byte]).is_ok(),
            Some(Slot::Writer(file)) => file.write_all(&[byte]).is_ok(),
            _ => false,
        }
    }

    fn free_slot(&self) -> Option<usize> {
        self.slots.iter().skip(3).position(|s| matches!(s, Slot::Empty)).map(|i| i + 3)
    }

    fn slot_mut(&mut self, handle: u8) -> Option<&mut Slot> {
        self.slots.get_mut(handle as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn stdio_handles_are_preseeded() {
        let host = HostServices::new(Vec::new());
        assert!(matches!(host.slots[0], Slot::Stdin));
        assert!(matches!(host.slots[1], Slot::Stdout));
        assert!(matches!(host.slots[2], Slot::Stderr));
    }

    #[test]
    fn write_then_read_round_trips_through_a_handle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let mut host = HostServices::new(Vec::new());

        let w = host.open_write(path.to_str().unwrap()).expect("free slot");
        assert!(host.put_byte(w, b'a'));
        assert!(host.close(w));

        let r = host.open_read(path.to_str().unwrap()).expect("free slot");
        assert_eq!(host.get_byte(r), Some(b'a'));
        assert_eq!(host.get_byte(r), None);
    }

    #[test]
    fn opening_a_missing_file_yields_no_handle() {
        let mut host = HostServices::new(Vec::new());
        assert!(host.open_read("/nonexistent/path/for/wisp/tests").is_none());
    }

    #[test]
    fn exhausting_all_slots_yields_no_handle() {
        let dir = tempfile::tempdir().unwrap();
        let mut host = HostServices::new(Vec::new());
        for i in 0..5 {
            let path = dir.path().join(format!("f{i}.txt"));
            File::create(&path).unwrap().write_all(b"x").unwrap();
            assert!(host.open_read(path.to_str().unwrap()).is_some());
        }
        let path = dir.path().join("overflow.txt");
        File::create(&path).unwrap();
        assert!(host.open_read(path.to_str().unwrap()).is_none());
    }
}
