//! Purpose: Domain operations that issue remote calls and type their results.
//! Exports: `BotApi`, `ChatActions`, `ChatId`, `SendOptions`, `UpdatesOptions`, media details.
//! Role: Convenience layer between callers and the `RemoteInvoker` transport.
//! Invariants: Every typed result goes through the descriptor-driven builder.
//! Invariants: The invoker is always passed explicitly; there is no global client.
#![allow(clippy::result_large_err)]

use super::config::ApiConfig;
use super::remote::{HttpInvoker, RemoteInvoker};
use crate::core::error::{Error, ErrorKind};
use crate::core::scalar::json_kind;
use crate::types::{ApiType, Chat, ChatMember, Message, Update, User};
use serde::Serialize;
use serde_json::Value;

type ApiResult<T> = Result<T, Error>;

/// Target chat: numeric id or `@channelusername`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ChatId {
    Id(i64),
    Username(String),
}

impl From<i64> for ChatId {
    fn from(id: i64) -> Self {
        ChatId::Id(id)
    }
}

impl From<&str> for ChatId {
    fn from(username: &str) -> Self {
        ChatId::Username(username.to_string())
    }
}

impl From<&Chat> for ChatId {
    fn from(chat: &Chat) -> Self {
        ChatId::Id(chat.id)
    }
}

#[derive(Clone, Debug, Default)]
pub struct SendOptions {
    pub parse_mode: Option<String>,
    pub disable_web_page_preview: bool,
    pub disable_notification: bool,
    pub reply_to_message_id: Option<i64>,
    /// Pre-encoded keyboard markup, passed through untouched.
    pub reply_markup: Option<Value>,
}

impl SendOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parse_mode(mut self, parse_mode: impl Into<String>) -> Self {
        self.parse_mode = Some(parse_mode.into());
        self
    }

    pub fn reply_to(mut self, message_id: i64) -> Self {
        self.reply_to_message_id = Some(message_id);
        self
    }

    pub fn silent(mut self) -> Self {
        self.disable_notification = true;
        self
    }

    pub fn without_preview(mut self) -> Self {
        self.disable_web_page_preview = true;
        self
    }
}

/// Extra fields for `sendAudio`.
#[derive(Clone, Debug, Default)]
pub struct AudioDetails {
    /// Seconds.
    pub duration: Option<u32>,
    pub performer: Option<String>,
    pub title: Option<String>,
}

/// Extra fields for `sendVideo`.
#[derive(Clone, Debug, Default)]
pub struct VideoDetails {
    pub duration: Option<u32>,
    pub caption: Option<String>,
    pub supports_streaming: bool,
}

/// Extra fields for `sendVideoNote`.
#[derive(Clone, Debug, Default)]
pub struct VideoNoteDetails {
    pub duration: Option<u32>,
    /// Diameter of the round video, in pixels.
    pub length: Option<u32>,
}

#[derive(Clone, Debug, Default)]
pub struct UpdatesOptions {
    pub offset: Option<i64>,
    pub limit: Option<u32>,
    pub timeout_secs: Option<u32>,
}

#[derive(Serialize)]
struct NoArgs {}

#[derive(Serialize)]
struct ChatRequest<'a> {
    chat_id: &'a ChatId,
}

#[derive(Serialize)]
struct ChatMemberRequest<'a> {
    chat_id: &'a ChatId,
    user_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    until_date: Option<i64>,
}

#[derive(Serialize)]
struct UpdatesRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    offset: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    timeout: Option<u32>,
}

#[derive(Serialize)]
struct ChatActionRequest<'a> {
    chat_id: &'a ChatId,
    action: &'a str,
}

#[derive(Serialize)]
struct SendCommon<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_mode: Option<&'a str>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    disable_notification: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to_message_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_markup: Option<&'a Value>,
}

impl<'a> From<&'a SendOptions> for SendCommon<'a> {
    fn from(options: &'a SendOptions) -> Self {
        Self {
            parse_mode: options.parse_mode.as_deref(),
            disable_notification: options.disable_notification,
            reply_to_message_id: options.reply_to_message_id,
            reply_markup: options.reply_markup.as_ref(),
        }
    }
}

#[derive(Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a ChatId,
    text: &'a str,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    disable_web_page_preview: bool,
    #[serde(flatten)]
    common: SendCommon<'a>,
}

#[derive(Serialize)]
struct SendPhotoRequest<'a> {
    chat_id: &'a ChatId,
    photo: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    caption: Option<&'a str>,
    #[serde(flatten)]
    common: SendCommon<'a>,
}

#[derive(Serialize)]
struct SendAudioRequest<'a> {
    chat_id: &'a ChatId,
    audio: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    performer: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    #[serde(flatten)]
    common: SendCommon<'a>,
}

#[derive(Serialize)]
struct SendVideoRequest<'a> {
    chat_id: &'a ChatId,
    video: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    caption: Option<&'a str>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    supports_streaming: bool,
    #[serde(flatten)]
    common: SendCommon<'a>,
}

#[derive(Serialize)]
struct SendVideoNoteRequest<'a> {
    chat_id: &'a ChatId,
    video_note: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    length: Option<u32>,
    #[serde(flatten)]
    common: SendCommon<'a>,
}

#[derive(Serialize)]
struct SendContactRequest<'a> {
    chat_id: &'a ChatId,
    phone_number: &'a str,
    first_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_name: Option<&'a str>,
    #[serde(flatten)]
    common: SendCommon<'a>,
}

pub struct BotApi<I = HttpInvoker> {
    invoker: I,
}

impl BotApi<HttpInvoker> {
    pub fn from_config(config: &ApiConfig) -> ApiResult<Self> {
        Ok(Self::new(HttpInvoker::new(config)?))
    }
}

impl<I: RemoteInvoker> BotApi<I> {
    pub fn new(invoker: I) -> Self {
        Self { invoker }
    }

    pub fn invoker(&self) -> &I {
        &self.invoker
    }

    /// Calls `method` and returns the undecoded result.
    pub fn call_raw<A: Serialize>(&self, method: &str, arguments: &A) -> ApiResult<Value> {
        let arguments = serde_json::to_value(arguments).map_err(|err| {
            Error::new(ErrorKind::Internal)
                .with_message(format!("failed to encode arguments for {method}"))
                .with_source(err)
        })?;
        self.invoker.invoke(method, &arguments)
    }

    pub fn call<T: ApiType, A: Serialize>(&self, method: &str, arguments: &A) -> ApiResult<T> {
        T::from_response(&self.call_raw(method, arguments)?)
    }

    pub fn call_many<T: ApiType, A: Serialize>(
        &self,
        method: &str,
        arguments: &A,
    ) -> ApiResult<Vec<T>> {
        T::many_from_response(&self.call_raw(method, arguments)?)
    }

    fn call_bool<A: Serialize>(&self, method: &str, arguments: &A) -> ApiResult<bool> {
        match self.call_raw(method, arguments)? {
            Value::Bool(value) => Ok(value),
            other => Err(Error::new(ErrorKind::ShapeMismatch)
                .with_message(format!("{method} must return a boolean"))
                .with_expected("bool")
                .with_actual(json_kind(&other))),
        }
    }

    pub fn get_me(&self) -> ApiResult<User> {
        self.call("getMe", &NoArgs {})
    }

    pub fn get_updates(&self, options: &UpdatesOptions) -> ApiResult<Vec<Update>> {
        let request = UpdatesRequest {
            offset: options.offset,
            limit: options.limit,
            timeout: options.timeout_secs,
        };
        self.call_many("getUpdates", &request)
    }

    pub fn get_chat(&self, chat_id: &ChatId) -> ApiResult<Chat> {
        self.call("getChat", &ChatRequest { chat_id })
    }

    pub fn get_chat_administrators(&self, chat_id: &ChatId) -> ApiResult<Vec<ChatMember>> {
        self.call_many("getChatAdministrators", &ChatRequest { chat_id })
    }

    pub fn get_chat_member(&self, chat_id: &ChatId, user_id: i64) -> ApiResult<ChatMember> {
        let request = ChatMemberRequest {
            chat_id,
            user_id,
            until_date: None,
        };
        self.call("getChatMember", &request)
    }

    pub fn send_message(
        &self,
        chat_id: &ChatId,
        text: &str,
        options: &SendOptions,
    ) -> ApiResult<Message> {
        let request = SendMessageRequest {
            chat_id,
            text,
            disable_web_page_preview: options.disable_web_page_preview,
            common: options.into(),
        };
        self.call("sendMessage", &request)
    }

    /// `photo` is a file id already on the server or an HTTP URL.
    pub fn send_photo(
        &self,
        chat_id: &ChatId,
        photo: &str,
        caption: Option<&str>,
        options: &SendOptions,
    ) -> ApiResult<Message> {
        let request = SendPhotoRequest {
            chat_id,
            photo,
            caption,
            common: options.into(),
        };
        self.call("sendPhoto", &request)
    }

    /// `audio` is a file id or an HTTP URL, like every media argument below.
    pub fn send_audio(
        &self,
        chat_id: &ChatId,
        audio: &str,
        details: &AudioDetails,
        options: &SendOptions,
    ) -> ApiResult<Message> {
        let request = SendAudioRequest {
            chat_id,
            audio,
            duration: details.duration,
            performer: details.performer.as_deref(),
            title: details.title.as_deref(),
            common: options.into(),
        };
        self.call("sendAudio", &request)
    }

    pub fn send_video(
        &self,
        chat_id: &ChatId,
        video: &str,
        details: &VideoDetails,
        options: &SendOptions,
    ) -> ApiResult<Message> {
        let request = SendVideoRequest {
            chat_id,
            video,
            duration: details.duration,
            caption: details.caption.as_deref(),
            supports_streaming: details.supports_streaming,
            common: options.into(),
        };
        self.call("sendVideo", &request)
    }

    pub fn send_video_note(
        &self,
        chat_id: &ChatId,
        video_note: &str,
        details: &VideoNoteDetails,
        options: &SendOptions,
    ) -> ApiResult<Message> {
        let request = SendVideoNoteRequest {
            chat_id,
            video_note,
            duration: details.duration,
            length: details.length,
            common: options.into(),
        };
        self.call("sendVideoNote", &request)
    }

    pub fn send_contact(
        &self,
        chat_id: &ChatId,
        phone_number: &str,
        first_name: &str,
        last_name: Option<&str>,
        options: &SendOptions,
    ) -> ApiResult<Message> {
        let request = SendContactRequest {
            chat_id,
            phone_number,
            first_name,
            last_name,
            common: options.into(),
        };
        self.call("sendContact", &request)
    }

    /// `action` is one of `typing`, `upload_photo`, `record_video`, ...
    pub fn send_chat_action(&self, chat_id: &ChatId, action: &str) -> ApiResult<bool> {
        self.call_bool("sendChatAction", &ChatActionRequest { chat_id, action })
    }

    pub fn leave_chat(&self, chat_id: &ChatId) -> ApiResult<bool> {
        self.call_bool("leaveChat", &ChatRequest { chat_id })
    }

    pub fn kick_chat_member(
        &self,
        chat_id: &ChatId,
        user_id: i64,
        until_date: Option<i64>,
    ) -> ApiResult<bool> {
        let request = ChatMemberRequest {
            chat_id,
            user_id,
            until_date,
        };
        self.call_bool("kickChatMember", &request)
    }

    pub fn unban_chat_member(&self, chat_id: &ChatId, user_id: i64) -> ApiResult<bool> {
        let request = ChatMemberRequest {
            chat_id,
            user_id,
            until_date: None,
        };
        self.call_bool("unbanChatMember", &request)
    }
}

/// Operations scoped to one chat, bound to the client that performs them.
pub struct ChatActions<'a, I> {
    api: &'a BotApi<I>,
    chat_id: ChatId,
}

impl<'a, I: RemoteInvoker> ChatActions<'a, I> {
    pub fn new(api: &'a BotApi<I>, chat_id: impl Into<ChatId>) -> Self {
        Self {
            api,
            chat_id: chat_id.into(),
        }
    }

    pub fn chat_id(&self) -> &ChatId {
        &self.chat_id
    }

    pub fn send_message(&self, text: &str, options: &SendOptions) -> ApiResult<Message> {
        self.api.send_message(&self.chat_id, text, options)
    }

    pub fn send_photo(
        &self,
        photo: &str,
        caption: Option<&str>,
        options: &SendOptions,
    ) -> ApiResult<Message> {
        self.api.send_photo(&self.chat_id, photo, caption, options)
    }

    pub fn send_audio(
        &self,
        audio: &str,
        details: &AudioDetails,
        options: &SendOptions,
    ) -> ApiResult<Message> {
        self.api.send_audio(&self.chat_id, audio, details, options)
    }

    pub fn send_video(
        &self,
        video: &str,
        details: &VideoDetails,
        options: &SendOptions,
    ) -> ApiResult<Message> {
        self.api.send_video(&self.chat_id, video, details, options)
    }

    pub fn send_video_note(
        &self,
        video_note: &str,
        details: &VideoNoteDetails,
        options: &SendOptions,
    ) -> ApiResult<Message> {
        self.api
            .send_video_note(&self.chat_id, video_note, details, options)
    }

    pub fn send_contact(
        &self,
        phone_number: &str,
        first_name: &str,
        last_name: Option<&str>,
        options: &SendOptions,
    ) -> ApiResult<Message> {
        self.api
            .send_contact(&self.chat_id, phone_number, first_name, last_name, options)
    }

    pub fn send_action(&self, action: &str) -> ApiResult<bool> {
        self.api.send_chat_action(&self.chat_id, action)
    }

    pub fn leave(&self) -> ApiResult<bool> {
        self.api.leave_chat(&self.chat_id)
    }

    pub fn kick_member(&self, user_id: i64, until_date: Option<i64>) -> ApiResult<bool> {
        self.api.kick_chat_member(&self.chat_id, user_id, until_date)
    }

    pub fn unban_member(&self, user_id: i64) -> ApiResult<bool> {
        self.api.unban_chat_member(&self.chat_id, user_id)
    }
}
