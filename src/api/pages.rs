use axum::extract::State;
use axum::response::Html;

use crate::api::server::AppState;

const LAYOUT: &str = include_str!("../../templates/layout.html");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Index,
    ImageDescriber,
    SpeechToText,
    TextToSpeech,
    CommunicationBridge,
    DocumentReader,
    SavedContent,
}

impl Page {
    pub const ALL: [Self; 7] = [
        Self::Index,
        Self::ImageDescriber,
        Self::SpeechToText,
        Self::TextToSpeech,
        Self::CommunicationBridge,
        Self::DocumentReader,
        Self::SavedContent,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Self::Index => "/",
            Self::ImageDescriber => "/image-describer",
            Self::SpeechToText => "/speech-to-text",
            Self::TextToSpeech => "/text-to-speech",
            Self::CommunicationBridge => "/communication-bridge",
            Self::DocumentReader => "/document-reader",
            Self::SavedContent => "/saved-content",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Index => "AccessiBridge",
            Self::ImageDescriber => "Image Describer",
            Self::SpeechToText => "Speech to Text",
            Self::TextToSpeech => "Text to Speech",
            Self::CommunicationBridge => "Communication Bridge",
            Self::DocumentReader => "Document Reader",
            Self::SavedContent => "Saved Content",
        }
    }

    fn body(self) -> &'static str {
        match self {
            Self::Index => include_str!("../../templates/index.html"),
            Self::ImageDescriber => include_str!("../../templates/image_describer.html"),
            Self::SpeechToText => include_str!("../../templates/speech_to_text.html"),
            Self::TextToSpeech => include_str!("../../templates/text_to_speech.html"),
            Self::CommunicationBridge => include_str!("../../templates/communication_bridge.html"),
            Self::DocumentReader => include_str!("../../templates/document_reader.html"),
            Self::SavedContent => include_str!("../../templates/saved_content.html"),
        }
    }

    /// The availability flag is the only dynamic value on any page.
    pub fn render(self, gemini_available: bool) -> String {
        LAYOUT
            .replace("{{ title }}", self.title())
            .replace("{{ gemini_available }}", if gemini_available { "true" } else { "false" })
            .replace("{{ content }}", self.body())
    }
}

fn render_page(state: &AppState, page: Page) -> Html<String> {
    Html(page.render(state.gateway.is_available()))
}

pub async fn index_page(State(state): State<AppState>) -> Html<String> {
    render_page(&state, Page::Index)
}

pub async fn image_describer_page(State(state): State<AppState>) -> Html<String> {
    render_page(&state, Page::ImageDescriber)
}

pub async fn speech_to_text_page(State(state): State<AppState>) -> Html<String> {
    render_page(&state, Page::SpeechToText)
}

pub async fn text_to_speech_page(State(state): State<AppState>) -> Html<String> {
    render_page(&state, Page::TextToSpeech)
}

pub async fn communication_bridge_page(State(state): State<AppState>) -> Html<String> {
    render_page(&state, Page::CommunicationBridge)
}

pub async fn document_reader_page(State(state): State<AppState>) -> Html<String> {
    render_page(&state, Page::DocumentReader)
}

pub async fn saved_content_page(State(state): State<AppState>) -> Html<String> {
    render_page(&state, Page::SavedContent)
}
