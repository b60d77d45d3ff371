use dioxus::prelude::*;
use ollama_chat::{ExportedPdf, Session, PDF_FILE_NAME};
use tracing::error;

/* ================= SIDEBAR ================= */

#[component]
pub fn Sidebar(
    mut session: Signal<Session>,
    models: Signal<Option<Vec<String>>>,
    mut listing: Signal<u32>,
    live: Signal<Option<String>>,
) -> Element {
    // rendered export, or the reason it failed
    let mut pdf_link = use_signal(|| Option::<Result<ExportedPdf, String>>::None);

    let selected = session
        .read()
        .selected_model()
        .unwrap_or_default()
        .to_string();
    let options = models().unwrap_or_default();
    let busy = live.read().is_some();

    // an export of an older log must not be offered for download
    let download = match pdf_link() {
        Some(Ok(pdf)) if pdf.is_current(&session.read().log) => {
            let href = pdf.href().to_string();
            rsx! {
                a { class: "download-link big", href: "{href}", download: PDF_FILE_NAME, "Download" }
            }
        }
        Some(Err(reason)) => rsx! {
            p { class: "dim-text warning-text", "Export failed: {reason}" }
        },
        _ => rsx! {},
    };

    rsx! {
        div { class: "sidebar",
            h1 { class: "logo", "Settings :" }

            label { "Select an Ollama model:" }
            select {
                class: "input",
                value: "{selected}",
                disabled: busy || options.is_empty(),
                onchange: move |e| {
                    if session.write().select_model(&e.value()) {
                        pdf_link.set(None);
                    }
                },
                {options.iter().map(|m| rsx!( option { key: "{m}", selected: *m == selected, value: "{m}", "{m}" } ))}
            }

            button {
                class: "sidebar-btn big refresh-btn",
                disabled: busy,
                onclick: move |_| listing += 1,
                "Refresh models"
            }

            button {
                class: "sidebar-btn big",
                disabled: busy,
                onclick: move |_| {
                    match ExportedPdf::new(&session.read().log) {
                        Ok(pdf) => pdf_link.set(Some(Ok(pdf))),
                        Err(err) => {
                            error!(error = %err, "PDF export failed");
                            pdf_link.set(Some(Err(err.to_string())));
                        }
                    }
                },
                "Download Chat as PDF"
            }
            {download}

            button {
                class: "sidebar-btn big clear-btn",
                disabled: busy,
                onclick: move |_| {
                    session.write().clear();
                    pdf_link.set(None);
                },
                "Clear Chat"
            }
        }
    }
}
