use std::ffi::OsStr;
use std::io::{BufRead, BufReader, Error, stdout, ErrorKind};
use std::io::stderr;
use std::io::Write;
use std::path::Path;
use std::fs::File;
use csv;
use csv::StringRecord;
use flate2::read;

/// Creates a `Writer` object.
///
/// Attempts to open a file under a given name. However, if the name is `"stdout"` or `"stderr"`,
/// the returned `Writer` will be connected to either `stdout` or `stderr` stream, respectively.
/// Empty file name also results in writing to `stdout`.
///
/// # Arguments
/// * `out_fname` - file name, `"stdout"` or `"stderr"`
/// * `if_append` - existing file will be removed if false, otherwise the new content will be appended
pub fn out_writer(out_fname: &str, if_append: bool) -> Box<dyn Write> {
    match out_fname {
        "" => Box::new(stdout()) as Box<dyn Write>,
        "stdout" => Box::new(stdout()) as Box<dyn Write>,
        "stderr" => Box::new(stderr()) as Box<dyn Write>,
        _ => {
            let path = Path::new(out_fname);

            if if_append {
                let file = match File::options().append(true).write(true).create(true).open(path) {
                    Ok(file) => file,
                    Err(e) => panic!("can't open >{:?}<, error is: {:?}", &path, e),
                };
                Box::new(file) as Box<dyn Write>
            } else {
                let file = match File::create(path) {
                    Ok(file) => file,
                    Err(e) => panic!("can't open >{:?}<, error is: {:?}", &path, e),
                };
                Box::new(file) as Box<dyn Write>
            }
        }
    }
}

/// Reads values from a file in the tab-separated format
pub fn read_tsv<T: std::str::FromStr, R: BufRead>(reader: R) -> Result<Vec<Vec<T>>, Error> { read_csv_tsv(reader, b'\t') }

/// Reads values from a file in the comma-separated format
///
/// This function works as [read_tsv()], just with another delimiter
pub fn read_csv<T: std::str::FromStr, R: BufRead>(reader: R) -> Result<Vec<Vec<T>>, Error> { read_csv_tsv(reader, b',') }

/// Check if all fields of the given record are not empty
fn is_record_ok(rec: &StringRecord) -> bool {
    rec.iter().all(|e| !e.is_empty())
}

fn read_csv_tsv<T: std::str::FromStr, R: BufRead>(reader: R, delimiter: u8) -> Result<Vec<Vec<T>>, Error> {

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(delimiter)
        .from_reader(reader);

    let mut data: Vec<Vec<T>> = Vec::new();
    for record in rdr.records() {
        if let Ok(r) = &record {
            if !is_record_ok(r) { continue; }

            let row: Result<Vec<T>, _> = r.iter().map(|e| e.parse::<T>()).collect();

            let row = match row {
                Ok(values) => values,
                Err(_err) => {
                    return Err(Error::new(ErrorKind::Other, format!("Problem while parsing a value; the last record was: {:?}", &record)));
                }
            };

            data.push(row);
        }
    }

    Ok(data)
}

/// Opens a file for reading.
///
/// This function can open a regular file or a gzipped one, as determined by the extension
/// of the input file name. A boxed reader to the content is returned.
pub fn open_file(filename: &str) -> Result<Box<dyn BufRead>, Error> {
    if filename.is_empty() {
        panic!("\nCouldn't open file - file name is an empty string!");
    }
    let path = Path::new(filename);
    let file = match File::open(path) {
        Err(why) => return Err(why),
        Ok(file) => file,
    };

    if path.extension() == Some(OsStr::new("gz")) {
        Ok(Box::new(BufReader::with_capacity(
            128 * 1024,
            read::GzDecoder::new(file),
        )))
    } else {
        Ok(Box::new(BufReader::with_capacity(128 * 1024, file)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::BufReader;

    #[test]
    fn reads_tsv_into_typed_rows() {
        let txt = "1.0\t2.0\t3.0\n4.0\t5.0\t6.0\n";
        let rows: Vec<Vec<f64>> = read_tsv(BufReader::new(txt.as_bytes())).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn skips_rows_with_empty_fields() {
        let txt = "1.0,2.0\n,3.0\n4.0,5.0\n";
        let rows: Vec<Vec<f64>> = read_csv(BufReader::new(txt.as_bytes())).unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn out_writer_creates_a_file() {
        let path = "clue_io_unit_test.out";
        {
            let mut w = out_writer(path, false);
            writeln!(w, "hello").unwrap();
        }
        assert!(std::fs::metadata(path).is_ok());
        std::fs::remove_file(path).unwrap();
    }
}
