/// A Web API the matcher knows by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnownApi {
    /// Lower-case lookup key, as a user would type it.
    pub key: &'static str,
    /// Canonical display name.
    pub name: &'static str,
    /// Path segment under `/docs/Web/API/` on MDN.
    pub path: &'static str,
}

const fn api(key: &'static str, name: &'static str, path: &'static str) -> KnownApi {
    KnownApi { key, name, path }
}

/// Dictionary scanned by exact and fuzzy lookup. Order matters: on equal
/// similarity the earlier entry wins.
pub const KNOWN_APIS: &[KnownApi] = &[
    api("fetch", "Fetch API", "Fetch_API"),
    api("fetch api", "Fetch API", "Fetch_API"),
    api("webgl", "WebGL API", "WebGL_API"),
    api("web audio", "Web Audio API", "Web_Audio_API"),
    api("service worker", "Service Worker API", "Service_Worker_API"),
    api("geolocation", "Geolocation API", "Geolocation_API"),
    api("notification", "Notifications API", "Notifications_API"),
    api("websocket", "WebSocket API", "WebSockets_API"),
    api("canvas", "Canvas API", "Canvas_API"),
    api("indexeddb", "IndexedDB API", "IndexedDB_API"),
    api("web workers", "Web Workers API", "Web_Workers_API"),
    api("file api", "File API", "File_API"),
    api("drag and drop", "HTML Drag and Drop API", "HTML_Drag_and_Drop_API"),
    api("history", "History API", "History_API"),
    api("payment request", "Payment Request API", "Payment_Request_API"),
    api("web bluetooth", "Web Bluetooth API", "Web_Bluetooth_API"),
    api("web usb", "WebUSB API", "WebUSB_API"),
    api("intersection observer", "Intersection Observer API", "Intersection_Observer_API"),
    api("resize observer", "Resize Observer API", "Resize_Observer_API"),
    api("mutation observer", "MutationObserver", "MutationObserver"),
    api("performance", "Performance API", "Performance_API"),
    api("fullscreen", "Fullscreen API", "Fullscreen_API"),
    api("screen orientation", "Screen Orientation API", "Screen_Orientation_API"),
    api("vibration", "Vibration API", "Vibration_API"),
    api("battery", "Battery Status API", "Battery_Status_API"),
    api("gamepad", "Gamepad API", "Gamepad_API"),
    api("media capture", "Media Capture and Streams", "Media_Capture_and_Streams_API"),
    api("webrtc", "WebRTC API", "WebRTC_API"),
    api("credentialmanagement", "Credential Management API", "Credential_Management_API"),
    api("web authentication", "Web Authentication API", "Web_Authentication_API"),
    api("pointer events", "Pointer Events", "Pointer_events"),
    api("touch events", "Touch Events", "Touch_events"),
    api("server sent events", "Server-sent Events", "Server-sent_events"),
    api("broadcast channel", "Broadcast Channel API", "Broadcast_Channel_API"),
    api("channel messaging", "Channel Messaging API", "Channel_Messaging_API"),
];

/// Exact lookup by normalized key.
pub fn lookup_known(normalized: &str) -> Option<&'static KnownApi> {
    KNOWN_APIS.iter().find(|api| api.key == normalized)
}
