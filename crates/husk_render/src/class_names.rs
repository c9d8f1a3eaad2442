//! Class name concatenation

/// Join class names, splitting on whitespace and dropping duplicates
///
/// `None` and empty entries are skipped; first occurrence order is kept.
pub fn class_names<'a, I>(classes: I) -> String
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut seen: Vec<&str> = Vec::new();
    for class in classes.into_iter().flatten().flat_map(str::split_whitespace) {
        if !seen.contains(&class) {
            seen.push(class);
        }
    }
    seen.join(" ")
}
