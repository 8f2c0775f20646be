//! Inline `style` attribute helpers.

/// Split a style attribute into `(property, value)` pairs, property lowercased.
pub fn declarations(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|declaration| {
            let (property, value) = declaration.split_once(':')?;
            let property = property.trim();
            if property.is_empty() {
                return None;
            }
            Some((property.to_ascii_lowercase(), value.trim().to_owned()))
        })
        .collect()
}

/// Return `style` with `name` set to `value`, or removed when `value` is empty.
pub fn with_declaration(style: &str, name: &str, value: &str) -> String {
    let name = name.to_ascii_lowercase();
    let mut pairs = declarations(style);
    if value.is_empty() {
        pairs.retain(|(property, _)| *property != name);
    } else if let Some(slot) = pairs.iter_mut().find(|(property, _)| *property == name) {
        value.clone_into(&mut slot.1);
    } else {
        pairs.push((name, value.to_owned()));
    }
    pairs
        .iter()
        .map(|(property, declared)| format!("{property}: {declared};"))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sets_and_removes_display() {
        let hidden = with_declaration("color: red", "display", "none");
        assert_eq!(hidden, "color: red; display: none;");
        assert_eq!(with_declaration(&hidden, "display", ""), "color: red;");
        assert_eq!(with_declaration("display:none", "DISPLAY", ""), "");
    }
}
