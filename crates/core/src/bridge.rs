//! Render bridge script generation.
//!
//! The server bundle runs inside a bare `deno_core` isolate, so before it
//! executes we install a small prelude: the render data global, minimal
//! Node/Web shims the bundle expects, and `globalThis.__inkstream__`, the
//! callback surface the bundle drives the streaming render through
//! (chunk emission, style collection, lifecycle signals).
//!
//! Pure string transformation; the isolate work happens in the shell crate.

use crate::error::{CoreError, Result};

/// Generate the prelude executed before the server bundle.
///
/// Uses safe JSON injection via double-encoding to prevent injection
/// attacks through render data.
pub fn generate_bridge(config_json: &str, node_env: &str) -> Result<String> {
    // Double-encode: a JSON string containing JSON
    let config_json_escaped = serde_json::to_string(config_json)
        .map_err(|e| CoreError::Serialization(e.to_string()))?;

    let node_env_escaped = node_env.replace('\\', "\\\\").replace('\'', "\\'");

    let ops_bridge = OPS_BRIDGE;
    let console_shim = CONSOLE_SHIM;
    let text_codec_shim = TEXT_CODEC_SHIM;

    Ok(format!(
        r#"
// Render data - safely injected by the host
globalThis.__INKSTREAM_DATA__ = JSON.parse({config_json_escaped});

// Process shim (Node.js compatibility)
globalThis.process = {{
    env: {{ NODE_ENV: '{node_env_escaped}' }},
    nextTick: (fn) => queueMicrotask(fn),
}};

{ops_bridge}
{console_shim}
{text_codec_shim}
"#
    ))
}

const OPS_BRIDGE: &str = r#"
// Callback surface for the streaming render. The bundle emits markup chunks
// and style rules through here, and signals shell/all readiness and the two
// failure paths.
globalThis.__inkstream__ = {
    emit: (chunk) => Deno.core.ops.op_emit_chunk(String(chunk)),
    style: (key, css) => Deno.core.ops.op_collect_style(String(key), String(css)),
    shellReady: () => Deno.core.ops.op_shell_ready(),
    allReady: () => Deno.core.ops.op_all_ready(),
    shellError: (err) => Deno.core.ops.op_shell_error(err instanceof Error ? err.message : String(err)),
    streamError: (err) => Deno.core.ops.op_stream_error(err instanceof Error ? err.message : String(err)),
};
"#;

const CONSOLE_SHIM: &str = r#"
// Console shim - forward bundle logs to host stdout/stderr
globalThis.console = {
    log: (...args) => Deno.core.print('[JS] ' + args.map(a => typeof a === 'object' ? JSON.stringify(a) : String(a)).join(' ') + '\n', false),
    error: (...args) => Deno.core.print('[JS ERROR] ' + args.map(a => typeof a === 'object' ? JSON.stringify(a) : String(a)).join(' ') + '\n', true),
    warn: (...args) => Deno.core.print('[JS WARN] ' + args.map(a => typeof a === 'object' ? JSON.stringify(a) : String(a)).join(' ') + '\n', false),
    info: (...args) => Deno.core.print('[JS] ' + args.map(a => typeof a === 'object' ? JSON.stringify(a) : String(a)).join(' ') + '\n', false),
    debug: () => {},
};
"#;

const TEXT_CODEC_SHIM: &str = r#"
// TextEncoder/TextDecoder shims (UTF-8 only)
class TextEncoderShim {
    encode(input) {
        const utf8 = unescape(encodeURIComponent(String(input ?? '')));
        const bytes = new Uint8Array(utf8.length);
        for (let i = 0; i < utf8.length; i++) bytes[i] = utf8.charCodeAt(i);
        return bytes;
    }
}
class TextDecoderShim {
    decode(input) {
        if (!input) return '';
        const bytes = input instanceof Uint8Array ? input : new Uint8Array(input);
        let result = '';
        for (let i = 0; i < bytes.length; i++) result += String.fromCharCode(bytes[i]);
        return decodeURIComponent(escape(result));
    }
}
globalThis.TextEncoder = TextEncoderShim;
globalThis.TextDecoder = TextDecoderShim;
"#;
