use thiserror::Error;

/// A row failed validation. Carries exactly one user facing message.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
	pub fn new(message: impl Into<String>) -> Self {
		Self(message.into())
	}
}

/// Failure while processing a single row.
#[derive(Debug, Error)]
pub enum ImportError {
	#[error(transparent)]
	Validation(#[from] ValidationError),
	#[error(transparent)]
	Other(#[from] anyhow::Error),
}

impl ImportError {
	/// The message reported to the caller, including the context chain of
	/// non-validation errors.
	#[must_use]
	pub fn message(&self) -> String {
		match self {
			ImportError::Validation(err) => err.0.clone(),
			ImportError::Other(err) => format!("{err:#}"),
		}
	}
}

/// The error returned by an import run.
///
/// `line` is the 1-based data row that failed. Errors raised before any row
/// is read (configuration, file format, worksheet layout) have no line.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{}", render(.line, .message))]
pub struct DataImportError {
	pub message: String,
	pub line: Option<usize>,
}

fn render(line: &Option<usize>, message: &str) -> String {
	match line {
		Some(line) => format!("Error importing file at line {line}: {message}"),
		None => message.to_string(),
	}
}

impl DataImportError {
	pub fn at_line(line: usize, message: impl Into<String>) -> Self {
		Self {
			message: message.into(),
			line: Some(line),
		}
	}

	pub fn format(message: impl Into<String>) -> Self {
		Self {
			message: message.into(),
			line: None,
		}
	}

	pub fn from_row(line: usize, err: &ImportError) -> Self {
		Self::at_line(line, err.message())
	}
}

impl From<anyhow::Error> for DataImportError {
	fn from(err: anyhow::Error) -> Self {
		DataImportError::format(format!("{err:#}"))
	}
}
