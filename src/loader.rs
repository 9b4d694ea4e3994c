//! Fetch a scene document and mount it inline.
//!
//! The document must be SVG: it is parsed with the browser's XML parser and
//! the resulting root element replaces whatever the mount held before.

use wasm_bindgen::JsCast;
use web_sys::{DomParser, Element, SupportedType, SvgsvgElement};

use crate::error::{InitError, js_error};

/// Inline sizing applied to the mounted root.
const ROOT_STYLE: [(&str, &str); 3] = [("width", "100%"), ("height", "100%"), ("display", "block")];

/// Fetch `url`, parse it as SVG and replace the mount's contents with it.
///
/// # Errors
///
/// [`InitError::Fetch`] if the request fails, [`InitError::HttpStatus`] on a
/// non-success answer and [`InitError::Parse`] if the body is not an SVG
/// document.
pub async fn load_inline_svg(mount: &Element, url: &str) -> Result<SvgsvgElement, InitError> {
    let text = fetch_text(url).await?;
    let svg = parse_svg(&text)?;

    mount.set_inner_html("");
    mount.append_child(&svg).map_err(|e| InitError::Parse(js_error(&e)))?;

    let style = svg.style();
    for (name, value) in ROOT_STYLE {
        if let Err(e) = style.set_property(name, value) {
            log::warn!("could not set {name} on scene root: {}", js_error(&e));
        }
    }
    Ok(svg)
}

async fn fetch_text(url: &str) -> Result<String, InitError> {
    let resp = gloo_net::http::Request::get(url)
        .send()
        .await
        .map_err(|e| InitError::Fetch(e.to_string()))?;
    let status = resp.status();
    if !(200..300).contains(&status) {
        return Err(InitError::HttpStatus { status, url: url.to_owned() });
    }
    resp.text().await.map_err(|e| InitError::Fetch(e.to_string()))
}

fn parse_svg(text: &str) -> Result<SvgsvgElement, InitError> {
    let parser = DomParser::new().map_err(|e| InitError::Parse(js_error(&e)))?;
    let doc = parser
        .parse_from_string(text, SupportedType::ImageSvgXml)
        .map_err(|e| InitError::Parse(js_error(&e)))?;

    let failed = doc.query_selector("parsererror").map_err(|e| InitError::Parse(js_error(&e)))?;
    if let Some(err) = failed {
        return Err(InitError::Parse(err.text_content().unwrap_or_default()));
    }

    let root = doc
        .document_element()
        .ok_or_else(|| InitError::Parse("empty document".into()))?;
    root.dyn_into::<SvgsvgElement>()
        .map_err(|el| InitError::Parse(format!("root element is <{}>, not <svg>", el.tag_name())))
}
