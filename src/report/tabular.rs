use super::ReportError;

/// Format-neutral table shared by every export encoder.
///
/// Every row has exactly one cell per header. The fields are private so that a built model
/// cannot be broken afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TabularModel {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl TabularModel {
    pub fn build(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, ReportError> {
        if let Some((row, cells)) = rows
            .iter()
            .enumerate()
            .find(|(_, cells)| cells.len() != headers.len())
        {
            return Err(ReportError::Shape {
                row,
                expected: headers.len(),
                actual: cells.len(),
            });
        }
        Ok(Self { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Number of data rows; the header is not counted.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Re-checks the shape; used by encoders before writing anything.
    pub(crate) fn check_shape(&self) -> Result<(), ReportError> {
        match self
            .rows
            .iter()
            .position(|cells| cells.len() != self.headers.len())
        {
            Some(row) => Err(ReportError::Encoding(format!(
                "row {row} does not match the {} headers",
                self.headers.len()
            ))),
            None => Ok(()),
        }
    }
}
