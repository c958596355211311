/// `first-name` => `_O10first_name`
pub fn mangle(name: &str) -> String {
    format!("_O{}{}", name.chars().count(), name.replace('-', "_"))
}

pub fn demangle(mangled: &str) -> Option<String> {
    let rest = mangled.strip_prefix("_O")?;
    let digits: String = rest.chars().take_while(|ch| ch.is_ascii_digit()).collect();
    let len = digits.parse::<usize>().ok()?;
    let name = &rest[digits.len()..];
    if name.chars().count() != len {
        return None;
    }
    Some(name.replace('_', "-"))
}
