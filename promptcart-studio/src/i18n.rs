//! Localized UI strings
//!
//! Two hard-coded string sets, one per [`DisplayLanguage`]. Every
//! user-visible message produced by the studio comes from here.

use crate::language::DisplayLanguage;
use serde::Serialize;

/// One complete UI string set
#[derive(Debug, Serialize)]
pub struct UiStrings {
    pub cart: &'static str,
    pub clear: &'static str,
    pub copy: &'static str,
    pub copied: &'static str,
    pub translate: &'static str,
    pub optimize: &'static str,
    pub settings: &'static str,
    pub save: &'static str,
    pub confirm: &'static str,
    pub cancel: &'static str,
    pub prompt_placeholder: &'static str,
    pub empty_cart_hint: &'static str,
    pub clear_title: &'static str,
    pub clear_message: &'static str,
    pub ai_error_title: &'static str,
    pub request_failed: &'static str,
    pub connection_hint: &'static str,
}

static ZH: UiStrings = UiStrings {
    cart: "已选标签",
    clear: "清空",
    copy: "复制",
    copied: "已复制",
    translate: "翻译",
    optimize: "AI 优化",
    settings: "设置",
    save: "保存",
    confirm: "确定",
    cancel: "取消",
    prompt_placeholder: "在此输入...",
    empty_cart_hint: "点击左侧选择标签",
    clear_title: "清空标签",
    clear_message: "确定要清空所有已选标签吗？此操作无法撤销。",
    ai_error_title: "AI Error",
    request_failed: "请求失败。",
    connection_hint: " 无法连接到服务器。请检查：1. 网络是否通畅；2. 如果在国内，是否开启了全局VPN代理或配置了正确的代理地址。",
};

static EN: UiStrings = UiStrings {
    cart: "Cart",
    clear: "Clear",
    copy: "Copy",
    copied: "Copied",
    translate: "Trans",
    optimize: "Optimize",
    settings: "Settings",
    save: "Save",
    confirm: "Confirm",
    cancel: "Cancel",
    prompt_placeholder: "Enter prompt...",
    empty_cart_hint: "Select tags",
    clear_title: "Clear Tags",
    clear_message: "Are you sure you want to clear all tags? This cannot be undone.",
    ai_error_title: "AI Error",
    request_failed: "Request failed.",
    connection_hint: " Connection failed. Please check your network or proxy settings.",
};

/// String set for a display language
pub fn strings(language: DisplayLanguage) -> &'static UiStrings {
    match language {
        DisplayLanguage::Primary => &ZH,
        DisplayLanguage::Secondary => &EN,
    }
}
