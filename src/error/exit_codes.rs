use crate::error::CheckError;

pub fn get_exit_code(error: &CheckError) -> i32 {
    match error {
        CheckError::Config(_) | CheckError::Toml(_) | CheckError::Json(_) => 2,

        CheckError::Retrieval(_) => 4,

        CheckError::Authentication(_) => 13,

        CheckError::Connection(_) => 20,

        CheckError::Read(_) => 21,

        CheckError::Comparison(_) | CheckError::Io(_) => 1,
    }
}
