pub const NAMESPACE_PREFIX: &str = "minecraft:";

/// Upper-cases every letter that follows a non-letter and lower-cases the rest,
/// so "netherite_ingot2x" keeps word breaks at digits as well as spaces.
pub fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut prev_is_letter = false;
    for ch in input.chars() {
        if ch.is_alphabetic() {
            if prev_is_letter {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(ch);
            prev_is_letter = false;
        }
    }
    out
}

/// Name used by the remote sources when a payload has none: the raw
/// identifier, namespace included, with underscores as spaces.
pub fn fallback_display_name(id: &str) -> String {
    title_case(&id.replace('_', " "))
}

/// Name used by the synthesizer: namespace stripped first.
pub fn derived_display_name(id: &str) -> String {
    let bare = id.strip_prefix(NAMESPACE_PREFIX).unwrap_or(id);
    title_case(&bare.replace('_', " "))
}

/// `diamond` becomes `minecraft:diamond`; namespaced ids are left alone.
pub fn qualified_id(id: &str) -> String {
    if id.starts_with(NAMESPACE_PREFIX) {
        id.to_string()
    } else {
        format!("{}{}", NAMESPACE_PREFIX, id)
    }
}
