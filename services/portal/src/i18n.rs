//! Localization store: active language and the label table
//!
//! The table is static; only the language selection is state, and it is
//! persisted raw (`"en"` / `"ja"`) under the `language` key.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, OnceLock, RwLock};

use common::KeyValueStore;
use tracing::{info, warn};

use crate::error::PortalResult;

/// Storage key of the language selection
pub const LANGUAGE_KEY: &str = "language";

/// Supported interface languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    En,
    Ja,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ja => "ja",
        }
    }

    /// Pick a language from a locale tag such as `ja-JP` or `ja_JP.UTF-8`
    ///
    /// Only the primary subtag matters; anything but Japanese is English.
    pub fn from_locale(locale: &str) -> Self {
        let primary = locale
            .split(['-', '_', '.'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        if primary == "ja" {
            Language::Ja
        } else {
            Language::En
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en" => Ok(Language::En),
            "ja" => Ok(Language::Ja),
            other => Err(format!("Unsupported language: {}", other)),
        }
    }
}

/// key, English, Japanese
const TRANSLATIONS: &[(&str, &str, &str)] = &[
    ("app.name", "DotsGames ID", "DotsGames ID"),
    (
        "app.tagline",
        "One ID for all your gaming platforms",
        "すべてのゲームプラットフォームのための1つのID",
    ),
    ("common.email", "Email", "メールアドレス"),
    ("common.password", "Password", "パスワード"),
    ("common.username", "Username", "ユーザー名"),
    ("common.submit", "Submit", "送信"),
    ("common.cancel", "Cancel", "キャンセル"),
    ("common.save", "Save", "保存"),
    ("common.loading", "Loading...", "読み込み中..."),
    ("common.error", "An error occurred", "エラーが発生しました"),
    ("common.success", "Success!", "成功しました！"),
    ("auth.login", "Login", "ログイン"),
    ("auth.register", "Register", "登録"),
    ("auth.logout", "Logout", "ログアウト"),
    ("auth.forgotPassword", "Forgot Password?", "パスワードをお忘れですか？"),
    ("auth.resetPassword", "Reset Password", "パスワードをリセット"),
    (
        "auth.noAccount",
        "Don't have an account?",
        "アカウントをお持ちでないですか？",
    ),
    (
        "auth.haveAccount",
        "Already have an account?",
        "すでにアカウントをお持ちですか？",
    ),
    ("auth.confirmPassword", "Confirm Password", "パスワードを確認"),
    (
        "auth.termsAgree",
        "I agree to the Terms and Conditions",
        "利用規約に同意します",
    ),
    (
        "auth.passwordResetSent",
        "Password reset instructions have been sent to your email",
        "パスワードリセットの手順がメールで送信されました",
    ),
    (
        "auth.loginFailed",
        "Login failed. Please check your credentials.",
        "ログインに失敗しました。認証情報を確認してください。",
    ),
    (
        "auth.registerFailed",
        "Registration failed. Email may already be in use.",
        "登録に失敗しました。メールアドレスがすでに使用されている可能性があります。",
    ),
    ("dashboard.title", "Dashboard", "ダッシュボード"),
    ("dashboard.welcome", "Welcome back", "お帰りなさい"),
    ("dashboard.accountSummary", "Account Summary", "アカウント概要"),
    ("dashboard.linkedPlatforms", "Linked Platforms", "連携済みプラットフォーム"),
    ("dashboard.recentActivity", "Recent Activity", "最近のアクティビティ"),
    (
        "dashboard.noActivity",
        "No recent activity",
        "最近のアクティビティはありません",
    ),
    ("dashboard.accountCreated", "Account created", "アカウント作成"),
    ("dashboard.platformLinked", "Platform linked", "プラットフォーム連携"),
    (
        "dashboard.platformUnlinked",
        "Platform unlinked",
        "プラットフォーム連携解除",
    ),
    ("dashboard.profileUpdated", "Profile updated", "プロフィール更新"),
    ("profile.title", "Profile", "プロフィール"),
    ("profile.personalInfo", "Personal Information", "個人情報"),
    (
        "profile.updateSuccess",
        "Profile updated successfully",
        "プロフィールが正常に更新されました",
    ),
    (
        "profile.updateFailed",
        "Failed to update profile",
        "プロフィールの更新に失敗しました",
    ),
    ("platform.title", "Gaming Platforms", "ゲームプラットフォーム"),
    ("platform.link", "Link", "連携"),
    ("platform.unlink", "Unlink", "連携解除"),
    ("platform.linkAccount", "Link Account", "アカウントを連携"),
    (
        "platform.platformUsername",
        "Platform Username",
        "プラットフォームのユーザー名",
    ),
    (
        "platform.linkSuccess",
        "Platform linked successfully",
        "プラットフォームが正常に連携されました",
    ),
    (
        "platform.unlinkSuccess",
        "Platform unlinked successfully",
        "プラットフォームの連携が正常に解除されました",
    ),
    (
        "platform.linkFailed",
        "Failed to link platform",
        "プラットフォームの連携に失敗しました",
    ),
    (
        "platform.unlinkFailed",
        "Failed to unlink platform",
        "プラットフォームの連携解除に失敗しました",
    ),
    (
        "platform.noLinkedPlatforms",
        "No linked platforms",
        "連携済みプラットフォームはありません",
    ),
    (
        "platform.linkPlatformPrompt",
        "Link your gaming platforms to access all your games in one place",
        "ゲームプラットフォームを連携して、すべてのゲームに一か所からアクセスしましょう",
    ),
    ("landing.getStarted", "Get Started", "始める"),
    ("landing.features", "Features", "機能"),
    (
        "landing.feature1Title",
        "One ID for All Platforms",
        "すべてのプラットフォームのための1つのID",
    ),
    (
        "landing.feature1Desc",
        "Connect all your gaming accounts to a single DotsGames ID",
        "すべてのゲームアカウントを1つのDotsGames IDに連携",
    ),
    ("landing.feature2Title", "Secure Authentication", "安全な認証"),
    (
        "landing.feature2Desc",
        "Your gaming accounts are protected with industry-standard security",
        "ゲームアカウントは業界標準のセキュリティで保護されています",
    ),
    ("landing.feature3Title", "Easy Management", "簡単な管理"),
    (
        "landing.feature3Desc",
        "Manage all your gaming profiles from a single dashboard",
        "1つのダッシュボードからすべてのゲームプロフィールを管理",
    ),
];

fn table() -> &'static HashMap<&'static str, (&'static str, &'static str)> {
    static TABLE: OnceLock<HashMap<&'static str, (&'static str, &'static str)>> = OnceLock::new();
    TABLE.get_or_init(|| {
        TRANSLATIONS
            .iter()
            .map(|&(key, en, ja)| (key, (en, ja)))
            .collect()
    })
}

/// Localization store
pub struct LocalizationStore {
    language: RwLock<Language>,
    storage: Arc<dyn KeyValueStore>,
}

impl LocalizationStore {
    /// Create the store, restoring the persisted language
    ///
    /// Without a valid persisted selection the language comes from
    /// `locale_hint`, then defaults to English. The resolved selection is
    /// written back so it is always present after start.
    pub fn init(storage: Arc<dyn KeyValueStore>, locale_hint: Option<&str>) -> PortalResult<Self> {
        let stored = storage.get(LANGUAGE_KEY)?;
        let language = match stored.as_deref().map(str::parse::<Language>) {
            Some(Ok(language)) => language,
            Some(Err(e)) => {
                warn!("Ignoring persisted language: {}", e);
                locale_hint.map(Language::from_locale).unwrap_or_default()
            }
            None => locale_hint.map(Language::from_locale).unwrap_or_default(),
        };

        storage.set(LANGUAGE_KEY, language.code())?;
        info!("Interface language: {}", language);

        Ok(Self {
            language: RwLock::new(language),
            storage,
        })
    }

    pub fn language(&self) -> Language {
        *self.language.read().unwrap_or_else(|e| e.into_inner())
    }

    /// Switch language and persist the selection
    pub fn set_language(&self, language: Language) -> PortalResult<()> {
        self.storage.set(LANGUAGE_KEY, language.code())?;
        *self.language.write().unwrap_or_else(|e| e.into_inner()) = language;
        info!("Interface language changed to {}", language);
        Ok(())
    }

    /// Resolve `key` in the active language
    ///
    /// A missing key is echoed back unchanged.
    pub fn t(&self, key: &str) -> String {
        match table().get(key) {
            Some(&(en, ja)) => match self.language() {
                Language::En => en.to_string(),
                Language::Ja => ja.to_string(),
            },
            None => {
                warn!("Translation key not found: {}", key);
                key.to_string()
            }
        }
    }
}
