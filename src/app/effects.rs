use tracing::{info, warn};

use crate::app::{App, Message, Model, ToastLevel};

impl App {
    pub(super) fn handle_message_side_effects(model: &mut Model, msg: &Message) {
        if let Message::Save = msg {
            let lines = model.buffer.line_count();
            match model.buffer.save() {
                Ok(bytes) => {
                    info!(lines, bytes, "buffer saved");
                    model.show_toast(
                        ToastLevel::Info,
                        format!("\"{}\" {lines}L, {bytes}B written", model.file_name()),
                    );
                }
                Err(err) => {
                    warn!(error = %err, "save failed");
                    model.show_toast(ToastLevel::Error, format!("Save failed: {err}"));
                }
            }
        }
    }
}
