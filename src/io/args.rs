//! Argument sources

/// Process arguments without the program name.
///
/// Arguments that are not valid Unicode are converted lossily.
pub fn os_args() -> Vec<String> {
    std::env::args_os()
        .skip(1)
        .map(|a| a.to_string_lossy().into_owned())
        .collect()
}
