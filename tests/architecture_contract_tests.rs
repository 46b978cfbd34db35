mod support;

use support::architecture::find_lines_containing;

#[test]
fn domain_layer_has_no_io_or_outer_layer_imports() {
    let hits = find_lines_containing(
        "src/domain",
        &[
            "tokio",
            "reqwest",
            "teloxide",
            "std::fs",
            "crate::adapter",
            "crate::application",
            "crate::infrastructure",
        ],
    );
    assert!(
        hits.is_empty(),
        "domain layer should stay free of I/O and outer layers: {hits:#?}"
    );
}

#[test]
fn ports_depend_only_on_domain() {
    let hits = find_lines_containing(
        "src/port",
        &["crate::adapter", "crate::application", "crate::infrastructure"],
    );
    assert!(hits.is_empty(), "ports should not import outer layers: {hits:#?}");
}

#[test]
fn application_layer_has_no_direct_adapter_imports() {
    let hits = find_lines_containing(
        "src/application",
        &["crate::adapter::", "crate::infrastructure::", "reqwest", "teloxide"],
    );
    assert!(
        hits.is_empty(),
        "application layer should only talk to ports: {hits:#?}"
    );
}

#[test]
fn telegram_transport_is_confined_to_its_adapter() {
    let hits: Vec<_> = find_lines_containing("src", &["teloxide::"])
        .into_iter()
        .filter(|(path, _, _)| {
            !path.starts_with("src/adapter/outbound/telegram/") && path != "src/error.rs"
        })
        .collect();
    assert!(
        hits.is_empty(),
        "teloxide should only appear in the telegram adapter: {hits:#?}"
    );
}
