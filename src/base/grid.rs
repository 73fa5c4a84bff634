use super::{parse_number, read_text_rows, Delimiter, MapperError, TextRow};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Holds the georeference of a raster (ESRI ASCII grid header)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridHeader {
    /// x-coordinate of the lower-left corner
    pub xll_corner: f64,

    /// y-coordinate of the lower-left corner
    pub yll_corner: f64,

    /// Size of a (square) cell
    pub cellsize: f64,

    /// Value flagging missing data in the file, if declared
    pub nodata: Option<f64>,
}

/// Holds a dense 2D array of values stored row-major
///
/// Row 0 is the first data row of the file (the northern edge for ESRI grids).
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T> {
    nrow: usize,
    ncol: usize,
    data: Vec<T>,
    header: Option<GridHeader>,
}

impl<T: Copy> Grid<T> {
    /// Allocates a new grid with all values equal to `value`
    pub fn filled(nrow: usize, ncol: usize, value: T) -> Result<Self, MapperError> {
        if nrow < 1 || ncol < 1 {
            return Err(MapperError::InvalidData(format!(
                "grid dimensions must be ≥ 1; found {}x{}",
                nrow, ncol
            )));
        }
        Ok(Grid {
            nrow,
            ncol,
            data: vec![value; nrow * ncol],
            header: None,
        })
    }

    /// Allocates a new grid from nested rows
    ///
    /// ```
    /// use map2mesh::base::Grid;
    /// let dem = Grid::from(&[[10.0, 10.0], [10.0, 10.0]]).unwrap();
    /// assert_eq!(dem.dims(), (2, 2));
    /// ```
    pub fn from<R>(rows: &[R]) -> Result<Self, MapperError>
    where
        R: AsRef<[T]>,
    {
        let nrow = rows.len();
        let ncol = rows.first().map_or(0, |r| r.as_ref().len());
        if nrow < 1 || ncol < 1 {
            return Err(MapperError::InvalidData("grid must have at least one row and one column".to_string()));
        }
        let mut data = Vec::with_capacity(nrow * ncol);
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != ncol {
                return Err(MapperError::InvalidData(format!(
                    "row {} has {} columns; expected {}",
                    i,
                    row.len(),
                    ncol
                )));
            }
            data.extend_from_slice(row);
        }
        Ok(Grid {
            nrow,
            ncol,
            data,
            header: None,
        })
    }

    /// Returns the dimensions (nrow, ncol)
    pub fn dims(&self) -> (usize, usize) {
        (self.nrow, self.ncol)
    }

    /// Returns the number of rows
    pub fn nrow(&self) -> usize {
        self.nrow
    }

    /// Returns the number of columns
    pub fn ncol(&self) -> usize {
        self.ncol
    }

    /// Returns the value at (i, j)
    ///
    /// # Panics
    ///
    /// This function panics if the indices are out of range.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> T {
        assert!(i < self.nrow && j < self.ncol);
        self.data[i * self.ncol + j]
    }

    /// Sets the value at (i, j)
    ///
    /// # Panics
    ///
    /// This function panics if the indices are out of range.
    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: T) {
        assert!(i < self.nrow && j < self.ncol);
        self.data[i * self.ncol + j] = value;
    }

    /// Returns all values (row-major)
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Returns the values of row i
    pub fn row(&self, i: usize) -> &[T] {
        &self.data[i * self.ncol..(i + 1) * self.ncol]
    }

    /// Returns a copy of the values as nested rows
    pub fn to_rows(&self) -> Vec<Vec<T>> {
        self.data.chunks(self.ncol).map(|r| r.to_vec()).collect()
    }

    /// Returns the georeference, if any
    pub fn header(&self) -> Option<&GridHeader> {
        self.header.as_ref()
    }

    /// Sets the georeference
    pub fn set_header(&mut self, header: Option<GridHeader>) -> &mut Self {
        self.header = header;
        self
    }

    /// Returns a new grid (same dimensions and header) with `f` applied to every value
    pub fn map<U, F>(&self, f: F) -> Grid<U>
    where
        U: Copy,
        F: Fn(T) -> U,
    {
        Grid {
            nrow: self.nrow,
            ncol: self.ncol,
            data: self.data.iter().map(|v| f(*v)).collect(),
            header: self.header,
        }
    }

    /// Assembles a grid from row-major data with the dimensions and header of `like`
    pub(crate) fn with_data_like<U: Copy>(like: &Grid<U>, data: Vec<T>) -> Self {
        assert_eq!(data.len(), like.nrow * like.ncol);
        Grid {
            nrow: like.nrow,
            ncol: like.ncol,
            data,
            header: like.header,
        }
    }
}

impl<T: Copy + Display> Grid<T> {
    /// Writes the values as a delimited text file (one grid row per line)
    ///
    /// Creates the parent directory if needed.
    pub fn write<P>(&self, full_path: &P, delimiter: Delimiter) -> Result<(), MapperError>
    where
        P: AsRef<Path> + ?Sized,
    {
        let path = full_path.as_ref();
        let to_write_error = |source| MapperError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(p) = path.parent() {
            fs::create_dir_all(p).map_err(to_write_error)?;
        }
        let file = File::create(path).map_err(to_write_error)?;
        let mut writer = BufWriter::new(file);
        let sep = delimiter.as_sep();
        for row in self.data.chunks(self.ncol) {
            let line: Vec<String> = row.iter().map(|v| v.to_string()).collect();
            writeln!(writer, "{}", line.join(&sep)).map_err(to_write_error)?;
        }
        writer.flush().map_err(to_write_error)?;
        Ok(())
    }
}

/// Holds the keywords of an ESRI ASCII grid header
const HEADER_KEYS: [&str; 8] = [
    "ncols",
    "nrows",
    "xllcorner",
    "yllcorner",
    "xllcenter",
    "yllcenter",
    "cellsize",
    "nodata_value",
];

impl Grid<f64> {
    /// Reads a raster from a delimited text file or an ESRI ASCII grid
    ///
    /// # Input
    ///
    /// * `full_path` -- may be a String, &str, or Path
    /// * `delimiter` -- separator of the data fields (header lines are always whitespace-separated)
    /// * `comment` -- everything after this character is ignored
    ///
    /// # Note
    ///
    /// The ESRI header is optional. Without it, every line is a grid row and all rows
    /// must have the same number of fields. With it, the values may wrap freely across
    /// lines but their count must equal `nrows × ncols`.
    pub fn read<P>(full_path: &P, delimiter: Delimiter, comment: char) -> Result<Self, MapperError>
    where
        P: AsRef<Path> + ?Sized,
    {
        let path = full_path.as_ref();
        let rows = read_text_rows(path, delimiter, comment)?;
        if rows.is_empty() {
            return Err(MapperError::Empty { path: path.to_path_buf() });
        }
        let n_header = rows.iter().take_while(|r| is_header_row(r)).count();
        if n_header > 0 {
            read_esri(path, &rows[..n_header], &rows[n_header..])
        } else {
            read_plain(path, &rows)
        }
    }

    /// Returns true if the elevation is usable (finite and non-negative)
    #[inline]
    pub fn is_valid(value: f64) -> bool {
        value.is_finite() && value >= 0.0
    }

    /// Returns the number of valid values
    pub fn count_valid(&self) -> usize {
        self.data.iter().filter(|v| Grid::is_valid(**v)).count()
    }

    /// Returns the mean of the valid values or None if there are none
    pub fn mean_valid(&self) -> Option<f64> {
        let (sum, count) = self
            .data
            .iter()
            .filter(|v| Grid::is_valid(**v))
            .fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
        if count == 0 {
            None
        } else {
            Some(sum / (count as f64))
        }
    }

    /// Moves the lower-left corner to the origin (0, 0)
    ///
    /// A default header (cellsize = 1) is created if none exists.
    pub fn reset_origin(&mut self) -> &mut Self {
        let header = self.header.get_or_insert(GridHeader {
            xll_corner: 0.0,
            yll_corner: 0.0,
            cellsize: 1.0,
            nodata: None,
        });
        header.xll_corner = 0.0;
        header.yll_corner = 0.0;
        self
    }
}

/// Checks whether a row starts with an ESRI header keyword
fn is_header_row(row: &TextRow) -> bool {
    match row.fields.first() {
        Some(first) => {
            let key = first.split_whitespace().next().unwrap_or("").to_lowercase();
            HEADER_KEYS.contains(&key.as_str())
        }
        None => false,
    }
}

/// Parses a grid without header
fn read_plain(path: &Path, rows: &[TextRow]) -> Result<Grid<f64>, MapperError> {
    let ncol = rows[0].fields.len();
    let mut data = Vec::with_capacity(rows.len() * ncol);
    for row in rows {
        if row.fields.len() != ncol {
            return Err(MapperError::Malformed {
                path: path.to_path_buf(),
                line: row.line,
                reason: format!("expected {} fields, found {}", ncol, row.fields.len()),
            });
        }
        for (j, text) in row.fields.iter().enumerate() {
            data.push(parse_number(path, row.line, j + 1, text)?);
        }
    }
    Ok(Grid {
        nrow: rows.len(),
        ncol,
        data,
        header: None,
    })
}

/// Parses an ESRI ASCII grid
fn read_esri(path: &Path, header_rows: &[TextRow], rows: &[TextRow]) -> Result<Grid<f64>, MapperError> {
    let malformed = |line: usize, reason: String| MapperError::Malformed {
        path: path.to_path_buf(),
        line,
        reason,
    };

    // header
    let (mut ncol, mut nrow) = (None, None);
    let (mut xll, mut yll, mut center) = (0.0, 0.0, false);
    let mut cellsize = 1.0;
    let mut nodata = None;
    for row in header_rows {
        let joined = row.fields.join(" ");
        let tokens: Vec<&str> = joined.split_whitespace().collect();
        if tokens.len() != 2 {
            return Err(malformed(row.line, format!("header line must be `key value`; found `{}`", joined)));
        }
        let key = tokens[0].to_lowercase();
        let value = parse_number(path, row.line, 2, tokens[1])?;
        let as_count = |v: f64| {
            if v >= 1.0 && v.fract() == 0.0 && v < usize::MAX as f64 {
                Ok(v as usize)
            } else {
                Err(malformed(row.line, format!("`{}` must be a positive integer", key)))
            }
        };
        match key.as_str() {
            "ncols" => ncol = Some(as_count(value)?),
            "nrows" => nrow = Some(as_count(value)?),
            "xllcorner" => xll = value,
            "yllcorner" => yll = value,
            "xllcenter" => {
                xll = value;
                center = true;
            }
            "yllcenter" => {
                yll = value;
                center = true;
            }
            "cellsize" => cellsize = value,
            _ => nodata = Some(value),
        }
    }
    let last_header_line = header_rows[header_rows.len() - 1].line;
    let ncol = ncol.ok_or_else(|| malformed(last_header_line, "missing `ncols` in header".to_string()))?;
    let nrow = nrow.ok_or_else(|| malformed(last_header_line, "missing `nrows` in header".to_string()))?;
    if center {
        xll -= 0.5 * cellsize;
        yll -= 0.5 * cellsize;
    }

    // values
    if rows.is_empty() {
        return Err(MapperError::Empty { path: path.to_path_buf() });
    }
    let size = nrow
        .checked_mul(ncol)
        .ok_or_else(|| malformed(last_header_line, format!("grid size {}x{} is too large", nrow, ncol)))?;
    let mut data = Vec::new();
    for row in rows {
        for (j, text) in row.fields.iter().enumerate() {
            data.push(parse_number(path, row.line, j + 1, text)?);
        }
    }
    if data.len() != size {
        let last_line = rows[rows.len() - 1].line;
        return Err(malformed(
            last_line,
            format!("expected {} values ({}x{}), found {}", size, nrow, ncol, data.len()),
        ));
    }
    Ok(Grid {
        nrow,
        ncol,
        data,
        header: Some(GridHeader {
            xll_corner: xll,
            yll_corner: yll,
            cellsize,
            nodata,
        }),
    })
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
