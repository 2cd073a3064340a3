use bedtrack_core::Registry;

/// Patient identifiers laid out as one centred column per hospital, in roster order.
///
/// Shorter columns are padded with blanks so every hospital's patients line up by admission
/// order:
///
/// ```text
/// Kingston Hamilton Toronto
///   123f     345d    654h
///   998Q             001a
/// ```
pub fn patient_table(registry: &Registry) -> String {
    let columns: Vec<(String, Vec<String>)> = registry
        .hospitals()
        .iter()
        .map(|h| (h.name(), h.patients().map(|p| p.id().to_string()).collect()))
        .collect();

    let widths: Vec<usize> = columns.iter().map(|(name, _)| name.len().max(4)).collect();
    let rows = columns.iter().map(|(_, ids)| ids.len()).max().unwrap_or(0);

    let line = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:^width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join(" ")
            .trim_end()
            .to_string()
    };

    let mut out = line(columns.iter().map(|(name, _)| name.as_str()).collect());
    out.push('\n');
    for row in 0..rows {
        let cells = columns
            .iter()
            .map(|(_, ids)| ids.get(row).map(String::as_str).unwrap_or(""))
            .collect();
        out.push_str(&line(cells));
        out.push('\n');
    }
    out
}
