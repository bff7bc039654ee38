use std::{
    fmt,
    fs::File,
    io::{self, BufRead, BufReader, Write},
    path::{Path, PathBuf},
};

use tracing::{debug, info, warn};

use crate::errors::Error;

/// Running total and count of the values parsed so far.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Accumulator {
    pub sum: f64,
    pub count: u64,
}

impl Accumulator {
    pub fn push(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
    }

    /// Builds the final report. Fails when no value was accumulated.
    pub fn report(&self, path: &Path) -> Result<Report, Error> {
        if self.count == 0 {
            return Err(Error::NoData {
                path: path.to_path_buf(),
            });
        }
        Ok(Report {
            path: path.to_path_buf(),
            sum: self.sum,
            count: self.count,
            mean: self.sum / self.count as f64,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub path: PathBuf,
    pub sum: f64,
    pub count: u64,
    pub mean: f64,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "LLC occupancy Statistics for {} ", self.path.display())?;
        writeln!(f, "Sum: {:?}", self.sum)?;
        writeln!(f, "Count: {} ", self.count)?;
        writeln!(f, "Avg: {:?}", self.mean)
    }
}

const ZSTD_MAGIC: [u8; 4] = [0x28, 0xB5, 0x2F, 0xFD];

/// Opens `src` for line reading. Files starting with the zstd frame magic
/// are decompressed on the fly, anything else is read as plain text.
pub fn open_input(src: &Path) -> Result<Box<dyn BufRead>, Error> {
    let file = File::open(src).map_err(|source| Error::FileAccess {
        path: src.to_path_buf(),
        source,
    })?;
    let mut reader = BufReader::new(file);
    let compressed = reader
        .fill_buf()
        .map_err(|source| Error::Read {
            path: src.to_path_buf(),
            source,
        })?
        .starts_with(&ZSTD_MAGIC);
    debug!(path = %src.display(), compressed, "opened input");

    if compressed {
        let decoder = zstd::Decoder::with_buffer(reader).map_err(|source| Error::FileAccess {
            path: src.to_path_buf(),
            source,
        })?;
        Ok(Box::new(BufReader::new(decoder)))
    } else {
        Ok(Box::new(reader))
    }
}

/// Reads one line into `buf`, terminator included. `\r\n` and a lone `\r`
/// are both translated to `\n`. Returns 0 at end of input.
fn read_text_line<R: BufRead>(reader: &mut R, buf: &mut Vec<u8>) -> io::Result<usize> {
    buf.clear();
    loop {
        let available = match reader.fill_buf() {
            Ok(available) => available,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        if available.is_empty() {
            return Ok(buf.len());
        }
        match available.iter().position(|&b| b == b'\n' || b == b'\r') {
            Some(i) => {
                let cr = available[i] == b'\r';
                buf.extend_from_slice(&available[..i]);
                buf.push(b'\n');
                reader.consume(i + 1);
                if cr && reader.fill_buf()?.first() == Some(&b'\n') {
                    reader.consume(1);
                }
                return Ok(buf.len());
            }
            None => {
                let n = available.len();
                buf.extend_from_slice(available);
                reader.consume(n);
            }
        }
    }
}

/// Parses every line of `reader` as a number.
///
/// Lines that do not parse are reported on `out` with their raw text,
/// terminator included, and are left out of the totals.
pub fn accumulate<R: BufRead, W: Write>(
    mut reader: R,
    out: &mut W,
    path: &Path,
) -> Result<Accumulator, Error> {
    let read_err = |source: io::Error| Error::Read {
        path: path.to_path_buf(),
        source,
    };
    let mut acc = Accumulator::default();
    let mut buf = Vec::new();
    let mut line_no: u64 = 0;

    while read_text_line(&mut reader, &mut buf).map_err(read_err)? > 0 {
        line_no += 1;
        let line = std::str::from_utf8(&buf)
            .map_err(|e| read_err(io::Error::new(io::ErrorKind::InvalidData, e)))?;

        match line.trim().parse::<f64>() {
            Ok(value) => acc.push(value),
            Err(e) => {
                debug!(line = line_no, text = line.trim_end(), "skipping: {}", e);
                writeln!(out, "{} is not a number!", line)?;
            }
        }
    }
    Ok(acc)
}

/// Reads `src` and writes the per-line diagnostics followed by the report.
pub fn compute_stats<W: Write>(src: &Path, out: &mut W) -> Result<Report, Error> {
    let reader = open_input(src)?;
    let acc = accumulate(reader, out, src)?;

    let report = match acc.report(src) {
        Ok(report) => report,
        Err(e) => {
            warn!(path = %src.display(), "no numeric values found");
            return Err(e);
        }
    };
    info!(count = report.count, sum = report.sum, "statistics computed");

    write!(out, "{}", report)?;
    out.flush()?;
    Ok(report)
}
