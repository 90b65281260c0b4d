use axum::{
    extract::Extension,
    response::{Html, IntoResponse, Response},
};

use crate::middleware::{redirect_to_login, AuthUser};

/// GET /dashboard - greets the signed-in user
///
/// Without a session (the path was made public) this answers like the gate does.
pub async fn dashboard(user: Option<Extension<AuthUser>>) -> Response {
    let Some(Extension(user)) = user else {
        return redirect_to_login();
    };

    Html(format!(
        "<!DOCTYPE html>\n<html>\n<head><title>Dashboard</title></head>\n<body>\n\
         <h1>Dashboard</h1>\n<p>Welcome, {}.</p>\n\
         <form method=\"post\" action=\"/logout\"><button type=\"submit\">Sign out</button></form>\n\
         </body>\n</html>\n",
        user.username
    ))
    .into_response()
}
