use std::path::Path;

use axum::{
    extract::{Multipart, State},
    response::IntoResponse,
};
use axum_extra::extract::CookieJar;
use image::ImageFormat;
use nikjin_user::{Profile, ProfilePicture, UpdateProfileInput, UserView};
use ulid::Ulid;

use crate::{
    auth::AuthUser,
    flash::{self, Flash},
    form::FormErrors,
    routes::AppState,
    template::{PageContext, Template},
};

const IMAGE_FORMATS: [ImageFormat; 4] = [
    ImageFormat::Png,
    ImageFormat::Jpeg,
    ImageFormat::Gif,
    ImageFormat::WebP,
];
const INVALID_IMAGE: &str = "Upload a valid image. The file you uploaded was either not an image or a corrupted image.";

#[derive(Default, Clone)]
pub struct ProfileForm {
    pub phone: String,
    pub address: String,
}

#[derive(askama::Template)]
#[template(path = "profile.html")]
pub struct ProfileTemplate {
    pub ctx: PageContext,
    pub user: UserView,
    pub profile: Profile,
    pub form: ProfileForm,
    pub errors: FormErrors,
}

pub async fn page(
    template: Template,
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let profile = match state.user_command.profile(&user.id).await {
        Ok(profile) => profile,
        Err(err) => {
            tracing::error!("{err}");

            return template.server_error();
        }
    };

    template.render(ProfileTemplate {
        ctx: template.ctx(),
        form: ProfileForm {
            phone: profile.phone.to_owned(),
            address: profile.address.to_owned(),
        },
        user,
        profile,
        errors: FormErrors::default(),
    })
}

struct Upload {
    extension: &'static str,
    bytes: Vec<u8>,
}

/// File extension of the decoded image format. The file name sent by the
/// browser is ignored, only bytes that decode as an accepted format pass.
fn image_extension(bytes: &[u8]) -> Option<&'static str> {
    let format = image::guess_format(bytes).ok()?;
    if !IMAGE_FORMATS.contains(&format) {
        return None;
    }

    if let Err(err) = image::load_from_memory_with_format(bytes, format) {
        tracing::warn!("rejected profile picture: {err}");

        return None;
    }

    format.extensions_str().first().copied()
}

pub async fn action(
    template: Template,
    jar: CookieJar,
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let mut form = ProfileForm::default();
    let mut errors = FormErrors::default();
    let mut clear_picture = false;
    let mut upload = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(err) => {
                tracing::warn!("invalid profile form: {err}");
                errors.add("profile_picture", INVALID_IMAGE);
                break;
            }
        };

        let name = field.name().unwrap_or_default().to_owned();
        let file_name = field.file_name().map(str::to_owned);
        let bytes = match field.bytes().await {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::warn!("invalid profile form field {name}: {err}");
                errors.add("profile_picture", INVALID_IMAGE);
                continue;
            }
        };

        match name.as_str() {
            "phone" => form.phone = String::from_utf8_lossy(&bytes).into_owned(),
            "address" => form.address = String::from_utf8_lossy(&bytes).into_owned(),
            "profile_picture_clear" => clear_picture = true,
            "profile_picture" => {
                if file_name.is_none_or(|file| file.is_empty()) || bytes.is_empty() {
                    continue;
                }

                match image_extension(&bytes) {
                    Some(extension) => {
                        upload = Some(Upload {
                            extension,
                            bytes: bytes.to_vec(),
                        })
                    }
                    None => errors.add("profile_picture", INVALID_IMAGE),
                }
            }
            _ => {}
        }
    }

    if !errors.is_empty() {
        return render_invalid(&template, &state, user, form, errors).await;
    }

    let mut saved = None;
    let profile_picture = match upload {
        Some(upload) => {
            let relative = format!(
                "profile_pics/{}-{}.{}",
                user.id,
                Ulid::new().to_string().to_lowercase(),
                upload.extension
            );
            let path = Path::new(&state.config.media.dir).join(&relative);

            if let Err(err) = save_upload(&path, &upload.bytes).await {
                tracing::error!("{err}");

                return template.server_error();
            }

            saved = Some(path);
            ProfilePicture::Replace(relative)
        }
        None if clear_picture => ProfilePicture::Clear,
        None => ProfilePicture::Keep,
    };

    let result = state
        .user_command
        .update_profile(
            &user.id,
            UpdateProfileInput {
                phone: form.phone.to_owned(),
                address: form.address.to_owned(),
                profile_picture,
            },
        )
        .await;

    if result.is_err() {
        if let Some(path) = saved {
            let _ = tokio::fs::remove_file(path).await;
        }
    }

    match result {
        Ok(_) => flash::redirect(jar, Flash::success("Profile updated successfully!"), "/profile"),
        Err(nikjin_shared::Error::Validate(validation)) => {
            render_invalid(&template, &state, user, form, FormErrors::from(&validation)).await
        }
        Err(err) => {
            tracing::error!("{err}");

            template.server_error()
        }
    }
}

async fn save_upload(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    tokio::fs::write(path, bytes).await?;

    Ok(())
}

async fn render_invalid(
    template: &Template,
    state: &AppState,
    user: UserView,
    form: ProfileForm,
    errors: FormErrors,
) -> axum::response::Response {
    let profile = match state.user_command.profile(&user.id).await {
        Ok(profile) => profile,
        Err(err) => {
            tracing::error!("{err}");

            return template.server_error();
        }
    };

    let mut ctx = template.ctx();
    ctx.messages
        .push(Flash::error("Please correct the errors below."));

    template.render(ProfileTemplate {
        ctx,
        user,
        profile,
        form,
        errors,
    })
}
