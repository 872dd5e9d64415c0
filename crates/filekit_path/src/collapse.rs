use crate::Platform;

/// Collapses `.` and `..` segments and repeated separators.
///
/// The output always uses `/`. A `..` that would climb above a relative start
/// is kept, one that would climb above `/` is dropped. An empty result
/// becomes `.`. A trailing separator is kept when the input had one and the
/// result is not `.`.
///
/// On [`Platform::Windows`] both `\` and `/` separate segments and a leading
/// `X:` drive designator is kept in front of the collapsed body.
pub fn collapse(path: &str, platform: Platform) -> String {
    if path.is_empty() {
        return ".".to_string();
    }

    let is_separator = |c: char| c == '/' || (platform.is_windows() && c == '\\');
    let (drive, rest) = split_drive(path, platform);
    let absolute = rest.starts_with(is_separator);
    let trailing = rest.ends_with(is_separator);

    let mut segments: Vec<&str> = Vec::new();
    for segment in rest.split(is_separator) {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.last().is_some_and(|last| *last != "..") {
                    segments.pop();
                } else if !absolute {
                    segments.push("..");
                }
            }
            _ => segments.push(segment),
        }
    }

    let body = segments.join("/");
    let mut out = String::with_capacity(path.len());
    out.push_str(drive);
    if absolute {
        out.push('/');
    }
    if body.is_empty() {
        if !absolute {
            out.push('.');
        }
        return out;
    }
    out.push_str(&body);
    if trailing {
        out.push('/');
    }
    out
}

fn split_drive(path: &str, platform: Platform) -> (&str, &str) {
    let bytes = path.as_bytes();
    if platform.is_windows() && bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
    {
        path.split_at(2)
    } else {
        ("", path)
    }
}
