use filehash_core::format::{format_duration, format_file_size, format_hash_display};
use handlebars::{
    Context, Handlebars, Helper, HelperResult, Output, RenderContext, RenderError,
    RenderErrorReason,
};

/// Width used by `short_hash` when none is given
const DEFAULT_SHORT_HASH_WIDTH: u64 = 16;

/// Register custom Handlebars helpers
pub fn register_helpers(handlebars: &mut Handlebars) {
    handlebars.register_helper("format_size", Box::new(format_size_helper));
    handlebars.register_helper("format_duration", Box::new(format_duration_helper));
    handlebars.register_helper("short_hash", Box::new(short_hash_helper));
    handlebars.register_helper("uppercase", Box::new(uppercase_helper));
}

fn helper_error(message: &str) -> RenderError {
    RenderError::from(RenderErrorReason::Other(message.into()))
}

fn u64_param(h: &Helper, name: &str) -> Result<u64, RenderError> {
    h.param(0)
        .and_then(|param| param.value().as_u64())
        .ok_or_else(|| helper_error(&format!("{name} expects a number")))
}

fn str_param<'a>(h: &'a Helper, name: &str) -> Result<&'a str, RenderError> {
    h.param(0)
        .and_then(|param| param.value().as_str())
        .ok_or_else(|| helper_error(&format!("{name} expects a string")))
}

/// Bytes as a human-readable size
fn format_size_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let bytes = u64_param(h, "format_size")?;
    out.write(&format_file_size(bytes))?;
    Ok(())
}

/// Milliseconds as `3.20s` or `1m 5.5s`
fn format_duration_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let millis = u64_param(h, "format_duration")?;
    out.write(&format_duration(millis as f64 / 1000.0))?;
    Ok(())
}

/// Digest truncated with a middle ellipsis, optional width as second parameter
fn short_hash_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let hash = str_param(h, "short_hash")?;
    let width = h
        .param(1)
        .and_then(|param| param.value().as_u64())
        .unwrap_or(DEFAULT_SHORT_HASH_WIDTH);

    out.write(&format_hash_display(hash, width as usize))?;
    Ok(())
}

fn uppercase_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let text = str_param(h, "uppercase")?;
    out.write(&text.to_uppercase())?;
    Ok(())
}
