//! Response validation before parsing.
//!
//! Turns a raw fetched response into a usable body or a fault. Exception
//! documents are recognized for both the WMS dialect
//! (`ServiceExceptionReport`/`ServiceException`) and OWS Common
//! (`ExceptionReport`/`Exception`/`ExceptionText`).

use ows_common::xml::{parse_document, XmlElement};
use ows_common::{OwsError, OwsResult, RawCapabilitiesResponse};
use tracing::debug;

/// Validate a response expected to carry an XML document.
pub fn validate_xml_response(response: &RawCapabilitiesResponse) -> OwsResult<String> {
    let body = response.body.trim_start_matches('\u{feff}');

    if !response.is_success() {
        // Services often return the exception document with an error status
        if let Some(fault) = parse_document(body).ok().and_then(|root| exception_fault(&root)) {
            return Err(fault);
        }
        return Err(OwsError::service(format!(
            "HTTP {} from {}",
            response.status, response.url
        )));
    }

    if body.trim().is_empty() {
        return Err(OwsError::service(format!("Empty response from {}", response.url)));
    }

    if !response.content_type_matches("xml") && !body.trim_start().starts_with('<') {
        return Err(OwsError::service(format!(
            "Expected XML from {} but got {}",
            response.url,
            response.content_type.as_deref().unwrap_or("unknown content")
        )));
    }

    let root = parse_document(body)?;
    if let Some(fault) = exception_fault(&root) {
        debug!(url = %response.url, "Service returned an exception document");
        return Err(fault);
    }

    Ok(response.body.clone())
}

/// Validate a response expected to carry JSON (OGC API variants).
pub fn validate_json_response(response: &RawCapabilitiesResponse) -> OwsResult<String> {
    if !response.is_success() {
        let detail = serde_json::from_str::<serde_json::Value>(&response.body)
            .ok()
            .as_ref()
            .and_then(json_exception)
            .map(|(_, message)| message)
            .unwrap_or_else(|| format!("HTTP {} from {}", response.status, response.url));
        return Err(OwsError::service(detail));
    }

    if response.body.trim().is_empty() {
        return Err(OwsError::service(format!("Empty response from {}", response.url)));
    }

    let value: serde_json::Value = serde_json::from_str(&response.body)?;
    if let Some((code, message)) = json_exception(&value) {
        return Err(OwsError::ServiceFault {
            code: Some(code),
            message,
        });
    }

    Ok(response.body.clone())
}

/// OGC API exception body: `{"code": "...", "description": "..."}`.
fn json_exception(value: &serde_json::Value) -> Option<(String, String)> {
    let obj = value.as_object()?;
    if obj.contains_key("collections") || obj.contains_key("links") {
        return None;
    }
    let code = obj.get("code")?.as_str()?.to_string();
    let message = obj
        .get("description")
        .and_then(|d| d.as_str())
        .unwrap_or(code.as_str())
        .to_string();
    Some((code, message))
}

/// Build a `ServiceFault` when the root is a recognized exception envelope.
pub fn exception_fault(root: &XmlElement) -> Option<OwsError> {
    let (item_name, code_attr) = match root.name.as_str() {
        "ServiceExceptionReport" => ("ServiceException", "code"),
        "ExceptionReport" => ("Exception", "exceptionCode"),
        _ => return None,
    };

    let mut code = None;
    let mut messages = Vec::new();
    for item in root.children(item_name) {
        if code.is_none() {
            code = item.attr(code_attr).map(str::to_string);
        }
        let texts = item.children_text("ExceptionText");
        let text = if texts.is_empty() {
            item.text().trim().to_string()
        } else {
            texts.join(" ")
        };
        if !text.is_empty() {
            messages.push(text);
        }
    }

    let message = if messages.is_empty() {
        format!("{} without message", root.name)
    } else {
        messages.join("; ")
    };
    Some(OwsError::ServiceFault { code, message })
}
