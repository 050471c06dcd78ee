//! Caller-facing console messages in the supported languages.
//!
//! Every message is a [`MessageKey`] variant resolved by an exhaustive match,
//! so a key cannot exist without a translation for each [`Language`].

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Languages the console can speak.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Language {
    /// Portuguese
    #[default]
    Pt,
    /// Spanish
    Es,
}

impl Language {
    /// Switches between the two supported languages.
    pub fn toggled(self) -> Self {
        match self {
            Self::Pt => Self::Es,
            Self::Es => Self::Pt,
        }
    }
}

/// Keys for every message the console shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum MessageKey {
    LoginTitle,
    LoginUsername,
    LoginPassword,
    LoginError,
    LoginWelcome,
    LoggedOut,
    SessionRequired,
    SessionPending,
    NewsletterSubject,
    NewsletterNews,
    NewsletterNewsCount,
    NewsletterTitleLabel,
    NewsletterContentLabel,
    NewsletterPreviewTitle,
    FillAllFields,
    BeforePreview,
    BeforeSend,
    ConfirmSend,
    TestSent,
    SentSuccess,
    EmailsSent,
    ErrorPreview,
    ErrorSend,
    DeliveryRejected,
    DispatchBusy,
    CommonLoading,
    CommonSuccess,
    CommonError,
}

impl MessageKey {
    /// Returns the message text for `language`.
    pub fn text(self, language: Language) -> &'static str {
        use Language::{Es, Pt};
        use MessageKey::*;

        match (self, language) {
            (LoginTitle, Pt) => "Login",
            (LoginTitle, Es) => "Iniciar Sesión",
            (LoginUsername, Pt) => "Usuário",
            (LoginUsername, Es) => "Usuario",
            (LoginPassword, Pt) => "Senha",
            (LoginPassword, Es) => "Contraseña",
            (LoginError, Pt) => "Usuário ou senha incorretos",
            (LoginError, Es) => "Usuario o contraseña incorrectos",
            (LoginWelcome, Pt) => "Sistema de Newsletter FCP",
            (LoginWelcome, Es) => "Sistema de Boletín FCP",
            (LoggedOut, Pt) => "Sessão encerrada",
            (LoggedOut, Es) => "Sesión cerrada",
            (SessionRequired, Pt) => "Faça login para continuar",
            (SessionRequired, Es) => "Inicie sesión para continuar",
            (SessionPending, Pt) => "Validando sessão...",
            (SessionPending, Es) => "Validando sesión...",
            (NewsletterSubject, Pt) => "Assunto da Newsletter",
            (NewsletterSubject, Es) => "Asunto del Boletín",
            (NewsletterNews, Pt) => "Notícias",
            (NewsletterNews, Es) => "Noticias",
            (NewsletterNewsCount, Pt) => "Notícia",
            (NewsletterNewsCount, Es) => "Noticia",
            (NewsletterTitleLabel, _) => "Título",
            (NewsletterContentLabel, Pt) => "Conteúdo",
            (NewsletterContentLabel, Es) => "Contenido",
            (NewsletterPreviewTitle, Pt) => "Preview da Newsletter",
            (NewsletterPreviewTitle, Es) => "Vista Previa del Boletín",
            (FillAllFields, Pt) => "Preencha todos os campos antes de",
            (FillAllFields, Es) => "Complete todos los campos antes de",
            (BeforePreview, _) => "visualizar",
            (BeforeSend, _) => "enviar",
            (ConfirmSend, Pt) => "Deseja enviar a newsletter para todos os leads?",
            (ConfirmSend, Es) => "¿Desea enviar el boletín a todos los contactos?",
            (TestSent, Pt) => "Email de teste enviado!",
            (TestSent, Es) => "¡Correo de prueba enviado!",
            (SentSuccess, Pt) => "Newsletter enviada!",
            (SentSuccess, Es) => "¡Boletín enviado!",
            (EmailsSent, Pt) => "emails enviados",
            (EmailsSent, Es) => "correos enviados",
            (ErrorPreview, Pt) => "Erro ao gerar preview",
            (ErrorPreview, Es) => "Error al generar vista previa",
            (ErrorSend, Pt) => "Erro ao enviar newsletter",
            (ErrorSend, Es) => "Error al enviar boletín",
            (DeliveryRejected, Pt) => "Envio recusado",
            (DeliveryRejected, Es) => "Envío rechazado",
            (DispatchBusy, Pt) => "Um envio já está em andamento",
            (DispatchBusy, Es) => "Ya hay un envío en curso",
            (CommonLoading, Pt) => "Carregando...",
            (CommonLoading, Es) => "Cargando...",
            (CommonSuccess, Pt) => "Sucesso",
            (CommonSuccess, Es) => "Éxito",
            (CommonError, Pt) => "Erro",
            (CommonError, Es) => "Error",
        }
    }
}

/// Warning shown when an ineligible draft is previewed or sent.
pub fn incomplete_draft_warning(language: Language, sending: bool) -> String {
    let action = if sending {
        MessageKey::BeforeSend
    } else {
        MessageKey::BeforePreview
    };
    format!(
        "{} {}",
        MessageKey::FillAllFields.text(language),
        action.text(language)
    )
}

/// Summary shown after a successful full send.
pub fn sent_summary(language: Language, total_sent: Option<u32>) -> String {
    match total_sent {
        Some(total) => format!(
            "{} {} {}",
            MessageKey::SentSuccess.text(language),
            total,
            MessageKey::EmailsSent.text(language)
        ),
        None => MessageKey::SentSuccess.text(language).to_string(),
    }
}
