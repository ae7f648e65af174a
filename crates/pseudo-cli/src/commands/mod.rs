pub mod family;
pub mod inspect;

use pseudofam::core::models::pseudo::PseudoPotential;

/// Joins output lines, terminating each with a newline.
pub(crate) fn join_lines(lines: &[String]) -> String {
    lines.iter().map(|line| format!("{line}\n")).collect()
}

/// Renders the details of one record as aligned `key: value` lines.
pub(crate) fn describe_pseudo(pseudo: &PseudoPotential) -> String {
    let mut lines = vec![
        format!("  filename:  {}", pseudo.filename()),
        format!("  type:      {}", pseudo.pseudo_type().entry_point()),
        format!("  element:   {}", pseudo.element()),
        format!("  md5:       {}", pseudo.md5()),
    ];
    if let Some(z_valence) = pseudo.z_valence() {
        lines.push(format!("  z_valence: {z_valence}"));
    }
    if let Some(xc_type) = pseudo.xc_type() {
        lines.push(format!("  xc_type:   {xc_type}"));
    }
    join_lines(&lines)
}
