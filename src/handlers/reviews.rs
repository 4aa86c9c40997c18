use axum::{
    extract::{rejection::FormRejection, Path, State},
    http::Uri,
    response::{IntoResponse, Redirect, Response},
    Form,
};

use crate::{
    auth::CurrentUser,
    catalog,
    error::AppError,
    flash::{self, Flash, Flashes},
    model::Dealer,
    review::{self, ReviewForm},
    state::AppState,
    views::{self, PageContext},
};

fn login_redirect(uri: &Uri) -> Response {
    let next = urlencoding::encode(uri.path());
    Redirect::to(&format!("/login/?next={}", next)).into_response()
}

async fn render_form(
    state: &AppState,
    ctx: PageContext,
    dealer: &Dealer,
    form: &ReviewForm,
    errors: &[String],
) -> Result<Response, AppError> {
    let makes = catalog::list_makes(&state.db).await?;
    let models = catalog::list_models(&state.db).await?;
    Ok(views::add_review(ctx, dealer, form, errors, &makes, &models))
}

pub async fn review_form(
    State(state): State<AppState>,
    Path(dealer_id): Path<i32>,
    uri: Uri,
    user: CurrentUser,
    flashes: Flashes,
) -> Result<Response, AppError> {
    if user.0.is_none() {
        return Ok(login_redirect(&uri));
    }
    let Some(dealer) = state.dealerships.find_dealer(dealer_id).await else {
        return Ok(flash::redirect("/", Flash::error("Dealer not found.")));
    };

    let ctx = PageContext::new(user, flashes);
    render_form(&state, ctx, &dealer, &ReviewForm::default(), &[]).await
}

pub async fn add_review(
    State(state): State<AppState>,
    Path(dealer_id): Path<i32>,
    uri: Uri,
    user: CurrentUser,
    flashes: Flashes,
    form: Result<Form<ReviewForm>, FormRejection>,
) -> Result<Response, AppError> {
    let Some(author) = &user.0 else {
        debug!("anonymous review submission for dealer {}", dealer_id);
        return Ok(login_redirect(&uri));
    };
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => return Ok(rejection.into_response()),
    };
    let Some(dealer) = state.dealerships.find_dealer(dealer_id).await else {
        return Ok(flash::redirect("/", Flash::error("Dealer not found.")));
    };

    let new_review = match form.validate() {
        Ok(new_review) => new_review,
        Err(errors) => {
            let ctx = PageContext::new(user, flashes);
            return render_form(&state, ctx, &dealer, &form, &errors).await;
        }
    };

    review::submit(&state.db, &state.sentiment, dealer_id, new_review).await?;
    info!("{} reviewed dealer {}", author.username, dealer_id);

    Ok(flash::redirect(
        &format!("/dealer/{}/", dealer_id),
        Flash::success("Your review has been submitted successfully!"),
    ))
}
