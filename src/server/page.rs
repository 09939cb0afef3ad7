/// Browser front end for the conversion service.
///
/// Uploads are posted as the raw request body to `/convert`; the reply is
/// either the converted file or a JSON `{"error": ...}` object.
pub const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>tabconv</title>
    <style>
        * { box-sizing: border-box; }
        body { font-family: system-ui, sans-serif; max-width: 720px; margin: 2rem auto; padding: 0 1rem; color: #222; }
        h1 { font-size: 1.4rem; }
        fieldset { border: 1px solid #ccc; border-radius: 6px; margin-bottom: 1rem; }
        label { display: inline-block; margin-right: 1rem; }
        textarea { width: 100%; height: 12rem; font-family: ui-monospace, monospace; }
        button { padding: 0.5rem 1.5rem; font-size: 1rem; }
        #status { margin-top: 1rem; white-space: pre-wrap; }
        .error { color: #b00020; }
        .ok { color: #1b5e20; }
    </style>
</head>
<body>
    <h1>Convert JSON, CSV and Excel</h1>

    <fieldset>
        <legend>Formats</legend>
        <label>From
            <select id="from">
                <option value="csv">CSV</option>
                <option value="json">JSON</option>
                <option value="xlsx">Excel (XLSX)</option>
            </select>
        </label>
        <label>To
            <select id="to">
                <option value="json">JSON</option>
                <option value="csv">CSV</option>
                <option value="xlsx">Excel (XLSX)</option>
            </select>
        </label>
    </fieldset>

    <fieldset>
        <legend>Input</legend>
        <label><input type="radio" name="source" value="file" checked> Upload a file</label>
        <label><input type="radio" name="source" value="paste"> Paste text</label>
        <p><input type="file" id="file" accept=".csv,.json,.xlsx"></p>
        <textarea id="pasted" placeholder="Paste CSV or JSON here" hidden></textarea>
    </fieldset>

    <button id="convert">Convert</button>
    <div id="status"></div>

    <script>
        const status = document.getElementById('status');
        const fileInput = document.getElementById('file');
        const pasted = document.getElementById('pasted');

        document.querySelectorAll('input[name=source]').forEach((radio) => {
            radio.addEventListener('change', () => {
                const paste = radio.value === 'paste' && radio.checked;
                fileInput.hidden = paste;
                pasted.hidden = !paste;
            });
        });

        function show(message, kind) {
            status.textContent = message;
            status.className = kind;
        }

        document.getElementById('convert').addEventListener('click', async () => {
            const from = document.getElementById('from').value;
            const to = document.getElementById('to').value;
            const source = document.querySelector('input[name=source]:checked').value;

            let body;
            let filename = 'converted.' + from;
            if (source === 'file') {
                if (!fileInput.files.length) {
                    show('No file selected for upload.', 'error');
                    return;
                }
                body = fileInput.files[0];
                filename = body.name;
            } else {
                if (from === 'xlsx') {
                    show('Excel conversion is only supported via file upload.', 'error');
                    return;
                }
                if (!pasted.value) {
                    show('No data pasted.', 'error');
                    return;
                }
                body = pasted.value;
            }

            const query = new URLSearchParams({ from, to, filename });
            show('Converting...', '');
            try {
                const response = await fetch('/convert?' + query.toString(), { method: 'POST', body });
                if (!response.ok) {
                    const failure = await response.json().catch(() => ({ error: response.statusText }));
                    show(failure.error, 'error');
                    return;
                }
                const disposition = response.headers.get('Content-Disposition') || '';
                const match = disposition.match(/filename="([^"]+)"/);
                const blob = await response.blob();
                const link = document.createElement('a');
                link.href = URL.createObjectURL(blob);
                link.download = match ? match[1] : 'converted.' + to;
                link.click();
                URL.revokeObjectURL(link.href);
                show('Converted to ' + link.download, 'ok');
            } catch (err) {
                show('Request failed: ' + err, 'error');
            }
        });
    </script>
</body>
</html>
"#;
