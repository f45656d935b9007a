use snafu::Snafu;

pub type CustomResult<T> = Result<T, Error>;

#[derive(Debug, Snafu, PartialEq)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("{}", message))]
    InvalidArgumentError { message: String },

    #[snafu(display("{} already exists", name))]
    AlreadyExistsError { name: String },

    #[snafu(display("file does not exist: {}", path))]
    FileDoesNotExistError { path: String },

    #[snafu(display("permission denied: {}", path))]
    PermissionDeniedError { path: String },

    #[snafu(display("failed reading file: {}", message))]
    FileReadError { message: String },
}
