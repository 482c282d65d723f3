use once_cell::sync::Lazy;
use regex::Regex;

/// 附件引用：不透明的存储键或 URL
static ATTACHMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9._:/-]{1,256}$").expect("Invalid attachment regex"));

pub const MAX_TITLE_CHARS: usize = 200;
pub const MAX_ATTACHMENTS: usize = 20;

pub fn validate_title(title: &str) -> Result<(), &'static str> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err("Title must not be empty");
    }
    if trimmed.chars().count() > MAX_TITLE_CHARS {
        return Err("Title must be at most 200 characters");
    }
    Ok(())
}

pub fn validate_max_points(max_points: f64) -> Result<(), &'static str> {
    // NaN 与无穷大同样拒绝
    if !max_points.is_finite() || max_points <= 0.0 {
        return Err("Max points must be a positive number");
    }
    Ok(())
}

pub fn validate_attachments(attachments: &[String]) -> Result<(), String> {
    if attachments.len() > MAX_ATTACHMENTS {
        return Err(format!(
            "At most {MAX_ATTACHMENTS} attachments are allowed, got {}",
            attachments.len()
        ));
    }
    if let Some(bad) = attachments.iter().find(|a| !ATTACHMENT_RE.is_match(a)) {
        return Err(format!("Invalid attachment reference: {bad}"));
    }
    Ok(())
}
