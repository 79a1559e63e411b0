/// Seam for desktop notification delivery.
pub trait Notify: Send + Sync {
    /// Fire-and-forget: delivery is never confirmed.
    fn notify(&self, title: &str, message: &str);
}

pub struct DesktopNotifier;

impl Notify for DesktopNotifier {
    fn notify(&self, title: &str, message: &str) {
        let shown = notify_rust::Notification::new()
            .summary(title)
            .body(message)
            .show();

        if let Err(e) = shown {
            log::warn!("Could not show notification: {}", e);
        }
    }
}

#[cfg(test)]
#[derive(Default)]
pub struct Recorder(pub std::sync::Mutex<Vec<(String, String)>>);

#[cfg(test)]
impl Notify for Recorder {
    fn notify(&self, title: &str, message: &str) {
        self.0
            .lock()
            .unwrap()
            .push((title.to_owned(), message.to_owned()));
    }
}
